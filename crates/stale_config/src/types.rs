//! Configuration types, both runtime and as deserialized from `stale.toml`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default name of the snapshot file inside the working directory.
pub const DEFAULT_CACHE_FILE: &str = ".stale-cache";

/// The resolved configuration for a single run.
///
/// Carries the working directory the host test runner is executing in (which
/// is where the snapshot file lives) and the snapshot file name, which the
/// host or `stale.toml` may override.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// The run's working directory.
    pub working_dir: PathBuf,
    /// Bare file name of the snapshot within `working_dir`.
    pub cache_file: String,
}

impl RunConfig {
    /// Creates a configuration with the default snapshot file name.
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
            cache_file: DEFAULT_CACHE_FILE.to_string(),
        }
    }

    /// Overrides the snapshot file name.
    pub fn with_cache_file(mut self, name: impl Into<String>) -> Self {
        self.cache_file = name.into();
        self
    }

    /// Returns the full path of the snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.working_dir.join(&self.cache_file)
    }
}

/// The top-level configuration parsed from `stale.toml`.
///
/// Every section and field is optional; an empty or absent file is equivalent
/// to the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// Snapshot cache settings.
    #[serde(default)]
    pub cache: CacheSection,
}

/// The `[cache]` section of `stale.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct CacheSection {
    /// Override for the snapshot file name.
    #[serde(default)]
    pub file: Option<String>,
}
