//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `stale.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// The configured cache file name is empty or not a bare file name.
    #[error("invalid cache file name: {0}")]
    InvalidCacheFile(String),
}
