// src/config/mod.rs

//! Engine configuration.
//!
//! Only two knobs matter to this core: how wide the delegated executor may
//! fan a wave out, and which execution identity owns the namespace objects
//! it creates on workers. Both can be loaded from TOML via [`loader`] or
//! built directly in code.

pub mod loader;

use serde::Deserialize;

use crate::errors::{Result, ShardflowError};

pub use loader::{default_config_path, load_and_validate, load_from_path};

/// Behavior knobs for a repartition run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum concurrent worker connections the delegated executor may use
    /// for one wave.
    pub max_task_pool_size: usize,

    /// Execution identity worker commands run as. Namespace objects are
    /// always owned by this role, regardless of who issued the query.
    pub extension_owner: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_task_pool_size: 16,
            extension_owner: "shardflow".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_task_pool_size == 0 {
            return Err(ShardflowError::Config(
                "max_task_pool_size must be >= 1 (got 0)".to_string(),
            ));
        }
        if self.extension_owner.trim().is_empty() {
            return Err(ShardflowError::Config(
                "extension_owner must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
