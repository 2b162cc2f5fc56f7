//! Error types for keywarden.
//!
//! Expected validation outcomes (expired key, unknown key, missing store)
//! are *not* errors — they live in [`crate::store::Validation`] and callers
//! branch on them. The variants here are genuine failures: bad caller input
//! or a store that cannot be written.

use std::fmt;

/// The single error type for all keywarden operations.
#[derive(Debug)]
pub enum KeywardenError {
    /// The requested duration amount was zero (or overflowed the timestamp
    /// range). Durations are a positive count of days, weeks, months, or
    /// years.
    InvalidDuration,

    /// The system's random number generator failed to produce bytes.
    RandomnessFailure,

    /// The store root could not be created or a record file could not be
    /// written (permissions, disk full). Issuance aborts and no partial
    /// record is left behind.
    StorageUnavailable(String),

    /// A record could not be serialized to JSON.
    RecordEncoding(String),
}

impl fmt::Display for KeywardenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDuration => write!(f, "duration must be a positive number of units"),
            Self::RandomnessFailure => write!(f, "randomness source failed"),
            Self::StorageUnavailable(detail) => write!(f, "storage unavailable: {}", detail),
            Self::RecordEncoding(detail) => write!(f, "record could not be encoded: {}", detail),
        }
    }
}

impl std::error::Error for KeywardenError {}
