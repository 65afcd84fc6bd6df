//! Source file hashing and own-change detection.
//!
//! A file's own change status is decided by comparing its current content
//! hash against the hash recorded by the last run. Hashes are computed
//! lazily, at most once per file per run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use stale_common::ContentHash;

use crate::error::EngineError;

/// Computes content hashes of source files.
pub struct SourceHasher;

impl SourceHasher {
    /// Computes the content hash of a single file.
    ///
    /// Reads the file's full byte contents and returns its XXH3-128 hash.
    /// An unreadable file is a hard error: its change status cannot be
    /// judged, so the failure propagates rather than being treated as
    /// "unchanged".
    pub fn hash_file(path: &Path) -> Result<ContentHash, EngineError> {
        let content = std::fs::read(path).map_err(|e| EngineError::io(path, e))?;
        Ok(ContentHash::from_bytes(&content))
    }
}

/// Per-run hash state: hashes computed this run plus those loaded from the
/// prior run's snapshot.
///
/// The `current` side is append-only within a run. Once a path has been
/// hashed its digest is reused for every later check, so a file modified
/// mid-run keeps a single consistent verdict.
pub struct HashIndex {
    current: HashMap<PathBuf, ContentHash>,
    prior: HashMap<PathBuf, ContentHash>,
}

impl HashIndex {
    /// Creates an index seeded with the prior run's hashes.
    pub fn new(prior: HashMap<PathBuf, ContentHash>) -> Self {
        Self {
            current: HashMap::new(),
            prior,
        }
    }

    /// Returns the file's hash, computing and recording it on first use.
    pub fn hash_of(&mut self, path: &Path) -> Result<ContentHash, EngineError> {
        if let Some(hash) = self.current.get(path) {
            return Ok(*hash);
        }
        let hash = SourceHasher::hash_file(path)?;
        self.current.insert(path.to_path_buf(), hash);
        Ok(hash)
    }

    /// Returns `true` if the file itself changed since the last run.
    ///
    /// A file with no prior hash entry is changed by definition; otherwise
    /// the current digest is compared against the recorded one. This is the
    /// non-transitive check: dependencies are the detector's concern.
    pub fn file_changed(&mut self, path: &Path) -> Result<bool, EngineError> {
        let hash = self.hash_of(path)?;
        Ok(match self.prior.get(path) {
            Some(prev) => *prev != hash,
            None => true,
        })
    }

    /// Returns the hashes computed this run.
    pub fn current(&self) -> &HashMap<PathBuf, ContentHash> {
        &self.current
    }

    /// Consumes the index, yielding `(current, prior)` for the final merge.
    pub fn into_parts(self) -> (HashMap<PathBuf, ContentHash>, HashMap<PathBuf, ContentHash>) {
        (self.current, self.prior)
    }
}
