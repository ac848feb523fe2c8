// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::EngineConfig;
use crate::errors::Result;

/// Load an [`EngineConfig`] from a TOML file.
///
/// This only performs deserialization; use [`load_and_validate`] to also
/// run semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: EngineConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Load an [`EngineConfig`] from a TOML file and validate it.
///
/// This is the recommended entry point for embedding applications.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let config = load_from_path(path)?;
    config.validate()?;
    Ok(config)
}

/// Default config path in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Shardflow.toml")
}
