//! Directory-backed key store.
//!
//! The filesystem is the sole source of truth: the store's membership is
//! "every record file currently under the root", with no index on the side.
//! Issuance appends one new file; validation is a recursive scan. Nothing is
//! ever rewritten in place, which is what makes concurrent issuance from
//! independent processes safe — writers touch distinct files and readers
//! only ever see complete ones.
//!
//! A validation running concurrently with an issuance may or may not observe
//! the new record. Visibility is whatever the filesystem provides; there is
//! no read-after-write guarantee across processes.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::crypto;
use crate::error::KeywardenError;
use crate::record::{KeyRecord, Unit};

/// How record files are arranged under the store root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// One subdirectory per issuance day (`YYYY-MM-DD`), filenames taken
    /// from the time of day (`key_HH-MM-SS.json`). This is the historical
    /// arrangement, kept so existing stores remain writable in place. Two
    /// keys issued within the same second land on the same name — a known
    /// constraint of the naming scheme, acceptable at the low issuance
    /// rates this store is built for.
    #[default]
    DatePartitioned,

    /// Every record directly under the root, filenames carrying the full
    /// timestamp plus an 8-hex-character random tag, so back-to-back
    /// issuance never overwrites an earlier record.
    Flat,
}

/// Outcome of presenting a secret to [`KeyStore::validate`].
///
/// `Expired` and `NotFound` are expected outcomes, not errors; callers
/// branch on them. `StoreMissing` signals operational misconfiguration — the
/// root itself is absent — which is worth distinguishing from a key that
/// simply was never issued.
#[derive(Debug, Clone)]
pub enum Validation {
    /// A record matches the presented secret and has not expired.
    Valid(KeyRecord),
    /// A record matches the presented secret but its expiry has passed.
    Expired,
    /// No record under the root matches the presented secret.
    NotFound,
    /// The store root does not exist at all.
    StoreMissing,
}

/// A freshly issued key: the record — the only place the plaintext secret
/// is ever observable — and the path it was persisted to.
#[derive(Debug, Clone)]
pub struct IssuedKey {
    pub record: KeyRecord,
    pub path: PathBuf,
}

/// A directory of persisted [`KeyRecord`]s.
///
/// The root is injected at construction so callers (and tests) can point
/// stores at temporary directories; there is no process-wide default here.
pub struct KeyStore {
    root: PathBuf,
    layout: Layout,
}

impl KeyStore {
    /// Open a store over `root` with the default date-partitioned layout.
    ///
    /// Nothing is touched on disk until the first issuance; the root is
    /// created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_layout(root, Layout::default())
    }

    /// Open a store over `root` with an explicit layout.
    pub fn with_layout(root: impl Into<PathBuf>, layout: Layout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Issue a new key valid for `duration` units from now.
    ///
    /// Generates a fresh 256-bit secret, computes its record, and persists
    /// it before returning. The returned [`IssuedKey`] carries the plaintext
    /// secret — this is the only moment it is available, so it must be
    /// communicated out-of-band; only the hash is useful for lookup later.
    pub fn issue(&self, duration: u32, unit: Unit) -> Result<IssuedKey, KeywardenError> {
        self.issue_inner(duration, unit, None)
    }

    /// Issue a new key, storing its record under a caller-chosen filename
    /// directly beneath the root instead of the layout-generated name.
    ///
    /// A `.json` extension is appended when missing, since the validation
    /// scan only considers `.json` files.
    pub fn issue_as(
        &self,
        duration: u32,
        unit: Unit,
        filename: &str,
    ) -> Result<IssuedKey, KeywardenError> {
        self.issue_inner(duration, unit, Some(filename))
    }

    fn issue_inner(
        &self,
        duration: u32,
        unit: Unit,
        filename: Option<&str>,
    ) -> Result<IssuedKey, KeywardenError> {
        let secret = crypto::generate_secret()?;
        let record = KeyRecord::new(secret, duration, unit, Utc::now())?;
        let path = self.persist(&record, filename)?;
        Ok(IssuedKey { record, path })
    }

    /// Write a record to its place under the root.
    ///
    /// The JSON is staged to a `.tmp` sibling and renamed into place, so the
    /// scan in [`validate`](Self::validate) only ever observes complete
    /// files — a crashed writer leaves behind a `.tmp` file the scan
    /// ignores, never a half-written record. Public so that migrated or
    /// synthetic records can be placed through the same path as issued ones.
    pub fn persist(
        &self,
        record: &KeyRecord,
        filename: Option<&str>,
    ) -> Result<PathBuf, KeywardenError> {
        let (dir, name) = match filename {
            Some(name) if name.ends_with(".json") => (self.root.clone(), name.to_string()),
            Some(name) => (self.root.clone(), format!("{}.json", name)),
            None => self.record_location(record)?,
        };

        fs::create_dir_all(&dir).map_err(|e| storage_error(&dir, &e))?;

        let path = dir.join(&name);
        let staged = dir.join(format!("{}.tmp", name));
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| KeywardenError::RecordEncoding(e.to_string()))?;

        if let Err(e) = fs::write(&staged, json) {
            // Never leave a partial record behind.
            let _ = fs::remove_file(&staged);
            return Err(storage_error(&staged, &e));
        }
        fs::rename(&staged, &path).map_err(|e| storage_error(&path, &e))?;

        Ok(path)
    }

    /// Layout-dictated directory and filename for a record.
    fn record_location(&self, record: &KeyRecord) -> Result<(PathBuf, String), KeywardenError> {
        match self.layout {
            Layout::DatePartitioned => {
                let dir = self.root.join(record.created.format("%Y-%m-%d").to_string());
                let name = format!("key_{}.json", record.created.format("%H-%M-%S"));
                Ok((dir, name))
            }
            Layout::Flat => {
                let stamp = record.created.format("%Y%m%d-%H%M%S");
                let tag = crypto::filename_tag()?;
                Ok((self.root.clone(), format!("key_{}_{}.json", stamp, tag)))
            }
        }
    }

    /// Check a presented secret against every record under the root.
    ///
    /// The presented secret is hashed and the root is walked recursively, so
    /// flat and date-partitioned stores (and mixtures of the two) all
    /// validate. The scan stops at the *first* record whose hash matches:
    /// that record alone decides the outcome, even if it has expired. With
    /// 256-bit secrets two records never share a hash in practice, so there
    /// is nothing to gain by scanning on for a better match.
    ///
    /// Files that fail to read or parse are skipped — a corrupt or foreign
    /// file must never block validation of the records around it.
    /// Validation mutates nothing: expired records stay on disk and keys are
    /// not single-use.
    pub fn validate(&self, presented: &str) -> Validation {
        if !self.root.is_dir() {
            return Validation::StoreMissing;
        }
        let hash = crypto::sha256_hex(presented);
        match find_matching(&self.root, &hash) {
            Some(record) if record.is_valid_at(Utc::now()) => Validation::Valid(record),
            Some(_) => Validation::Expired,
            None => Validation::NotFound,
        }
    }
}

/// Depth-first walk under `dir`; returns the first record whose hash equals
/// `hash`. Unreadable directories and unparseable files are skipped.
fn find_matching(dir: &Path, hash: &str) -> Option<KeyRecord> {
    let entries = fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if let Some(found) = find_matching(&path, hash) {
                return Some(found);
            }
        } else if path.extension().is_some_and(|ext| ext == "json") {
            if let Some(record) = read_record(&path) {
                if record.hash == hash {
                    return Some(record);
                }
            }
        }
    }
    None
}

/// Parse one record file. Any failure — unreadable, truncated, not JSON,
/// wrong shape — yields `None` and the caller moves on.
fn read_record(path: &Path) -> Option<KeyRecord> {
    let contents = fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

fn storage_error(path: &Path, err: &std::io::Error) -> KeywardenError {
    KeywardenError::StorageUnavailable(format!("{}: {}", path.display(), err))
}
