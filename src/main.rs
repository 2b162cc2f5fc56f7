//! Command-line front end: issue one key into the store and print it once.
//!
//! The plaintext secret is only ever shown here — it is not recoverable
//! from the store afterwards.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use keywarden::{KeyStore, Unit};

/// Issue a time-limited authentication key into a file-backed store.
#[derive(Parser)]
#[command(name = "keywarden", version, about)]
struct Args {
    /// Validity duration, counted in units of --unit.
    #[arg(long, default_value_t = 1)]
    duration: u32,

    /// Unit the duration is counted in.
    #[arg(long, value_enum, default_value_t = Unit::Years)]
    unit: Unit,

    /// Store the record under this filename (directly beneath the store
    /// root) instead of the generated date-based name.
    #[arg(long)]
    filename: Option<String>,

    /// Base directory holding key records.
    #[arg(long, default_value = "keys")]
    store: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let store = KeyStore::new(&args.store);

    let result = match args.filename.as_deref() {
        Some(name) => store.issue_as(args.duration, args.unit, name),
        None => store.issue(args.duration, args.unit),
    };

    match result {
        Ok(issued) => {
            println!("Generated Key:");
            println!("{}", issued.record.secret);
            println!(
                "Expires: {} ({} {})",
                issued.record.expires.to_rfc3339(),
                args.duration,
                args.unit
            );
            if args.filename.is_some() {
                println!("Stored at: {}", issued.path.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
