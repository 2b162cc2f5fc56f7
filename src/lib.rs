//! # keywarden
//!
//! File-backed issuance and validation of time-limited authentication keys.
//!
//! Each issued key is an opaque 256-bit bearer token. Its record — the
//! verification hash, the issuance and expiry timestamps, and the requested
//! validity — is written as one JSON file under a store directory, and
//! validation is a scan of that directory. There is no database and no
//! index: the filesystem is the sole source of truth, which keeps the store
//! trivially shareable between independent processes.
//!
//! ## Record format
//!
//! Every record file carries the fields `key`, `created`, `expires`,
//! `duration`, `unit`, `valid_days`, and `hash`. The names are frozen for
//! cross-version compatibility, and — inherited from the format — the
//! plaintext secret itself is persisted alongside its hash. Treat the store
//! directory as sensitive.
//!
//! ## Public API
//!
//! The surface is intentionally narrow: construct a [`KeyStore`], call
//! [`KeyStore::issue`] or [`KeyStore::validate`], branch on [`Validation`].
//! Everything else is `pub(crate)` at most.

// Module declarations.
pub(crate) mod crypto;
pub mod error;
pub mod record;
pub mod store;

pub use error::KeywardenError;
pub use record::{KeyRecord, Unit};
pub use store::{IssuedKey, KeyStore, Layout, Validation};
