//! Configuration loading and management
//!
//! Handles parsing of the optional `xpt.toml` file in the data directory.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Identifier generation settings
    #[serde(default)]
    pub ids: IdConfig,

    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Identifier generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdConfig {
    /// Prefix for task ids
    #[serde(default = "default_task_prefix")]
    pub task_prefix: String,

    /// Prefix for reward ids
    #[serde(default = "default_reward_prefix")]
    pub reward_prefix: String,

    /// Minimum length of the random id suffix
    #[serde(default = "default_id_min_len")]
    pub min_len: usize,
}

fn default_task_prefix() -> String {
    "t".to_string()
}

fn default_reward_prefix() -> String {
    "r".to_string()
}

fn default_id_min_len() -> usize {
    4
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            task_prefix: default_task_prefix(),
            reward_prefix: default_reward_prefix(),
            min_len: default_id_min_len(),
        }
    }
}

/// Display-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Number of entries shown by the recent-activity view
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_recent_limit() -> usize {
    50
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

impl Config {
    /// Load configuration from an `xpt.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults.
    ///
    /// Fails soft: an unreadable or invalid file is rejected with a warning
    /// and the defaults are used instead.
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join(crate::storage::CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                warn!(
                    file = %config_path.display(),
                    %err,
                    "invalid configuration file, using defaults"
                );
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        validate_prefix("ids.task_prefix", &self.ids.task_prefix)?;
        validate_prefix("ids.reward_prefix", &self.ids.reward_prefix)?;
        if self.ids.min_len < 1 || self.ids.min_len > 16 {
            return Err(Error::InvalidConfig(
                "ids.min_len must be between 1 and 16".to_string(),
            ));
        }
        if self.display.recent_limit == 0 {
            return Err(Error::InvalidConfig(
                "display.recent_limit must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_prefix(field: &str, prefix: &str) -> Result<()> {
    let trimmed = prefix.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidConfig(format!("{field} cannot be empty")));
    }
    if !trimmed.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return Err(Error::InvalidConfig(format!(
            "{field} must be alphanumeric"
        )));
    }
    Ok(())
}
