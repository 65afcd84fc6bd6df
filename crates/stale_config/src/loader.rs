//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{ConfigFile, RunConfig};
use std::path::{Component, Path};

/// Name of the optional configuration file within the working directory.
pub const CONFIG_FILE: &str = "stale.toml";

/// Loads the run configuration for a working directory.
///
/// Reads `<working_dir>/stale.toml` if it exists and applies its overrides;
/// a missing file yields the defaults. The file name override is validated
/// to be a bare file name.
pub fn load_config(working_dir: &Path) -> Result<RunConfig, ConfigError> {
    let config_path = working_dir.join(CONFIG_FILE);
    if !config_path.is_file() {
        return Ok(RunConfig::new(working_dir));
    }
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(working_dir, &content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(working_dir: &Path, content: &str) -> Result<RunConfig, ConfigError> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    let mut config = RunConfig::new(working_dir);
    if let Some(name) = file.cache.file {
        validate_cache_file(&name)?;
        config = config.with_cache_file(name);
    }
    Ok(config)
}

/// Validates that a cache file name is a non-empty bare file name.
fn validate_cache_file(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::InvalidCacheFile(name.to_string()));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(ConfigError::InvalidCacheFile(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.cache_file, crate::DEFAULT_CACHE_FILE);
    }

    #[test]
    fn parse_empty_config() {
        let config = load_config_from_str(Path::new("/work"), "").unwrap();
        assert_eq!(config.cache_file, crate::DEFAULT_CACHE_FILE);
    }

    #[test]
    fn parse_cache_file_override() {
        let toml = r#"
[cache]
file = ".ci-stale"
"#;
        let config = load_config_from_str(Path::new("/work"), toml).unwrap();
        assert_eq!(config.cache_file, ".ci-stale");
        assert_eq!(config.snapshot_path(), PathBuf::from("/work/.ci-stale"));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[cache]\nfile = \"x\"\n").unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.cache_file, "x");
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str(Path::new("/work"), "not toml {{{").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn rejects_empty_cache_file() {
        let toml = "[cache]\nfile = \"\"\n";
        let err = load_config_from_str(Path::new("/work"), toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCacheFile(_)));
    }

    #[test]
    fn rejects_cache_file_with_separators() {
        let toml = "[cache]\nfile = \"../escape\"\n";
        let err = load_config_from_str(Path::new("/work"), toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCacheFile(_)));
    }
}
