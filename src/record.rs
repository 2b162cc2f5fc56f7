//! The key record model.
//!
//! A [`KeyRecord`] is one issued credential: the secret, its verification
//! hash, and the validity window the caller asked for. Records are values —
//! built once at issuance, serialized to disk, and never mutated. Whether a
//! key is still good is decided by the validator at query time, not by
//! rewriting the record.
//!
//! The serialized field names are frozen. Stores written by earlier versions
//! of this tool must keep validating, so renaming a JSON field is a breaking
//! change of the on-disk format.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto;
use crate::error::KeywardenError;

/// Duration units accepted at issuance.
///
/// The multipliers are fixed approximations: months are always 30 days,
/// years always 365. This is calendar-naive on purpose — every validity
/// window already issued under this scheme used these exact values, and a
/// calendar-aware replacement would silently shift existing expiry math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Days,
    Weeks,
    Months,
    Years,
}

impl Unit {
    /// Days represented by one of this unit.
    pub fn days(self) -> i64 {
        match self {
            Self::Days => 1,
            Self::Weeks => 7,
            Self::Months => 30,
            Self::Years => 365,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days => write!(f, "days"),
            Self::Weeks => write!(f, "weeks"),
            Self::Months => write!(f, "months"),
            Self::Years => write!(f, "years"),
        }
    }
}

/// One issued credential, exactly as persisted to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyRecord {
    /// The bearer token. Persisted in plaintext next to its hash — a
    /// compatibility obligation of the record format, not an oversight;
    /// see the format notes in the crate docs.
    #[serde(rename = "key")]
    pub secret: String,

    /// When the key was issued.
    pub created: DateTime<Utc>,

    /// The instant after which the key no longer validates.
    pub expires: DateTime<Utc>,

    /// The duration amount the caller asked for, kept for audit and display.
    pub duration: u32,

    /// The duration unit the caller asked for, kept for audit and display.
    pub unit: Unit,

    /// `duration * unit.days()` — the resolved validity in whole days.
    pub valid_days: i64,

    /// Lowercase hex SHA-256 of `secret`. Pure function of the secret;
    /// validation matches presented keys against this field.
    pub hash: String,
}

impl KeyRecord {
    /// Build the record for a freshly generated secret.
    ///
    /// Both timestamps derive from the single `now` argument, so
    /// `expires - created` is exactly `valid_days` days with no skew
    /// between the two fields.
    pub fn new(
        secret: String,
        duration: u32,
        unit: Unit,
        now: DateTime<Utc>,
    ) -> Result<Self, KeywardenError> {
        if duration == 0 {
            return Err(KeywardenError::InvalidDuration);
        }
        let valid_days = i64::from(duration) * unit.days();
        let expires = Duration::try_days(valid_days)
            .and_then(|d| now.checked_add_signed(d))
            .ok_or(KeywardenError::InvalidDuration)?;
        let hash = crypto::sha256_hex(&secret);

        Ok(Self {
            secret,
            created: now,
            expires,
            duration,
            unit,
            valid_days,
            hash,
        })
    }

    /// Whether the record still validates at `now`.
    ///
    /// Strict comparison: a key whose expiry equals `now` exactly is
    /// already expired.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(duration: u32, unit: Unit) -> KeyRecord {
        KeyRecord::new(crypto::generate_secret().unwrap(), duration, unit, Utc::now()).unwrap()
    }

    #[test]
    fn test_unit_multipliers() {
        assert_eq!(Unit::Days.days(), 1);
        assert_eq!(Unit::Weeks.days(), 7);
        assert_eq!(Unit::Months.days(), 30);
        assert_eq!(Unit::Years.days(), 365);
    }

    #[test]
    fn test_valid_days_resolution() {
        assert_eq!(record(1, Unit::Days).valid_days, 1);
        assert_eq!(record(2, Unit::Weeks).valid_days, 14);
        assert_eq!(record(3, Unit::Months).valid_days, 90);
        assert_eq!(record(1, Unit::Years).valid_days, 365);
    }

    #[test]
    fn test_expiry_is_exactly_created_plus_valid_days() {
        let r = record(6, Unit::Weeks);
        assert_eq!(r.expires - r.created, Duration::days(42));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let result = KeyRecord::new("s".to_string(), 0, Unit::Days, Utc::now());
        assert!(matches!(result, Err(KeywardenError::InvalidDuration)));
    }

    #[test]
    fn test_hash_is_sha256_of_secret() {
        let r = record(1, Unit::Days);
        assert_eq!(r.hash, crypto::sha256_hex(&r.secret));
        assert_eq!(r.hash.len(), crypto::HASH_HEX_LEN);
    }

    #[test]
    fn test_expiry_boundary_is_strict() {
        let r = record(1, Unit::Days);
        assert!(r.is_valid_at(r.created));
        assert!(r.is_valid_at(r.expires - Duration::seconds(1)));
        // Exactly at expiry: already expired.
        assert!(!r.is_valid_at(r.expires));
        assert!(!r.is_valid_at(r.expires + Duration::seconds(1)));
    }

    #[test]
    fn test_serialized_field_names_are_frozen() {
        let r = record(2, Unit::Months);
        let json = serde_json::to_string(&r).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let obj = value.as_object().unwrap();

        for field in ["key", "created", "expires", "duration", "unit", "valid_days", "hash"] {
            assert!(obj.contains_key(field), "missing field {}", field);
        }
        assert_eq!(obj["key"], r.secret);
        assert_eq!(obj["unit"], "months");
        assert_eq!(obj["duration"], 2);
        assert_eq!(obj["valid_days"], 60);
    }

    #[test]
    fn test_deserializes_persisted_form() {
        let json = r#"{
            "key": "0PN5J-sSXairr2zvQbSPLzAUbY14jcHJSLz7hzJzy2c",
            "created": "2026-01-05T09:30:00Z",
            "expires": "2027-01-05T09:30:00Z",
            "duration": 1,
            "unit": "years",
            "valid_days": 365,
            "hash": "9e0a1f4d9c7a5b3e1f2d4c6b8a0e2f4d6c8b0a2e4f6d8c0b2a4e6f8d0c2b4a6e"
        }"#;
        let r: KeyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.duration, 1);
        assert_eq!(r.unit, Unit::Years);
        assert_eq!(r.valid_days, 365);
        assert_eq!(r.expires - r.created, Duration::days(365));
    }
}
