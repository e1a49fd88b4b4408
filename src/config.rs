//! Driver configuration
//!
//! Loaded from JSON. Every field has a default, so `{}` is a valid config.
//!
//! ```json
//! {
//!   "default_options": ["use_outdated", {"soft_durability": true}],
//!   "log_level": "INFO"
//! }
//! ```

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::Severity;
use crate::query::RunOption;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Config text is not a valid driver config
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Dispatcher configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Options applied to every query before per-call options
    pub default_options: Vec<RunOption>,

    /// Minimum severity written by the logger (default: WARN)
    pub log_level: Severity,
}

impl DriverConfig {
    /// Parse a config from JSON text
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Replace the default options
    pub fn with_default_options(self, default_options: Vec<RunOption>) -> Self {
        Self {
            default_options,
            ..self
        }
    }

    /// Replace the log level
    pub fn with_log_level(self, log_level: Severity) -> Self {
        Self { log_level, ..self }
    }
}
