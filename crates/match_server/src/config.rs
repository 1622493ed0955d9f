//! Server configuration, loaded from TOML.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for the match server. Missing keys fall back to `Default`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Per-player time budget for a whole game.
    pub time_limit_secs: u64,
    /// How often the clock task wakes up.
    pub tick_interval_ms: u64,
    /// A match charged less than this long ago is skipped by a tick.
    pub min_tick_ms: u64,
    pub max_name_len: usize,
    pub max_chat_len: usize,
    /// Default filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: 600,
            tick_interval_ms: 100,
            min_tick_ms: 100,
            max_name_len: 32,
            max_chat_len: 256,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_limit_secs == 0 {
            return Err(ConfigError::Invalid("time_limit_secs must be positive".into()));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".into()));
        }
        if self.max_name_len == 0 {
            return Err(ConfigError::Invalid("max_name_len must be positive".into()));
        }
        Ok(())
    }

    pub fn time_limit_ms(&self) -> u64 {
        self.time_limit_secs.saturating_mul(1000)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
