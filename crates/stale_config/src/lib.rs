//! Run configuration for the stale change-detection engine.
//!
//! A run needs a working directory (where the snapshot file lives) and,
//! optionally, an override for the snapshot file name. The host can build a
//! [`RunConfig`] programmatically or load one from an optional `stale.toml`
//! in the working directory.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use types::{CacheSection, ConfigFile, RunConfig, DEFAULT_CACHE_FILE};
