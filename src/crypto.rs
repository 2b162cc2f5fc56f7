//! Low-level cryptographic operations.
//!
//! This is the only module in the crate that imports `ring` or `base64`
//! directly. All other modules obtain secrets, digests, and random filename
//! tags exclusively through the functions exposed here.
//!
//! Primitive choices:
//! - **Entropy**: 256 bits (32 bytes) per secret, via `SystemRandom`
//! - **Digest**: SHA-256, lowercase hex
//! - **Encoding**: URL-safe base64 with padding stripped, so a secret can be
//!   embedded in filenames, URLs, and headers without escaping

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ring::digest;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroize;

use crate::error::KeywardenError;

/// Entropy width of a secret in bytes (256 bits).
pub const SECRET_LEN: usize = 32;

/// Length of a hex-encoded SHA-256 digest in characters.
pub const HASH_HEX_LEN: usize = 64;

/// Generate a fresh secret string.
///
/// Draws `SECRET_LEN` bytes from `ring::rand::SystemRandom` — the only
/// source of randomness in the crate — and encodes them as URL-safe base64
/// without padding. The raw entropy bytes are overwritten before the buffer
/// is released.
///
/// At 256 bits of entropy, two secrets colliding is treated as impossible
/// rather than detected: there is no duplicate check anywhere downstream.
pub fn generate_secret() -> Result<String, KeywardenError> {
    let rng = SystemRandom::new();
    let mut buf = [0u8; SECRET_LEN];
    rng.fill(&mut buf).map_err(|_| KeywardenError::RandomnessFailure)?;
    let secret = URL_SAFE_NO_PAD.encode(buf);
    buf.zeroize();
    Ok(secret)
}

/// SHA-256 of a string's UTF-8 bytes, as lowercase hex.
///
/// This is the verification hash stored in every record: a pure function of
/// the secret, recomputed on each validation so presented keys are matched
/// by digest rather than by plaintext comparison.
pub fn sha256_hex(input: &str) -> String {
    let d = digest::digest(&digest::SHA256, input.as_bytes());
    d.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
}

/// A short random tag for flat-layout filenames: 4 random bytes as 8 hex
/// characters. Wide enough that rapid issuance within the same second never
/// lands two records on the same name in practice.
pub(crate) fn filename_tag() -> Result<String, KeywardenError> {
    let rng = SystemRandom::new();
    let mut buf = [0u8; 4];
    rng.fill(&mut buf).map_err(|_| KeywardenError::RandomnessFailure)?;
    Ok(buf.iter().map(|b| format!("{:02x}", b)).collect())
}
