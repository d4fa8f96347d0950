//! Loading and validation of the configuration file.

use crate::constants;
use crate::error::{KeygenError, Result};
use crate::models::config::ConfigFile;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Locate the configuration file: CLI arg, then env var, then `./apikey-gen.toml`.
///
/// The boolean is true when the file was named explicitly and must exist.
pub fn locate(config_arg: Option<PathBuf>) -> (PathBuf, bool) {
    if let Some(path) = config_arg {
        return (path, true);
    }
    if let Ok(path) = env::var(constants::ENV_CONFIG) {
        if !path.is_empty() {
            return (PathBuf::from(path), true);
        }
    }
    (PathBuf::from(constants::DEFAULT_CONFIG_FILE), false)
}

/// Load configuration from `path`. A missing optional file yields defaults.
pub fn load(path: &Path, required: bool) -> Result<ConfigFile> {
    if !required && !path.exists() {
        return Ok(ConfigFile::default());
    }
    let content = fs::read_to_string(path).map_err(|source| KeygenError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ConfigFile = toml::from_str(&content).map_err(|e| KeygenError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    validate(path, &config)?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

fn validate(path: &Path, config: &ConfigFile) -> Result<()> {
    let invalid = |message: String| KeygenError::Config {
        path: path.to_path_buf(),
        message,
    };
    if config.keygen.length == 0 {
        return Err(invalid("length must be at least 1".into()));
    }
    validate_property(&config.keygen.property).map_err(invalid)
}

/// A property key must be non-empty and contain no `=` or line break.
pub fn validate_property(property: &str) -> std::result::Result<(), String> {
    if property.is_empty() {
        return Err("property cannot be empty".into());
    }
    if property.contains(['=', '\n', '\r']) {
        return Err(format!("property '{}' contains '=' or a line break", property));
    }
    Ok(())
}
