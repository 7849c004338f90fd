//! Configuration file
//!
//! JSON object; every field is optional:
//!
//! ```json
//! { "registry": "outbreaks.json", "http_timeout_secs": 30, "id_column": "ID" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::observability::{log_event_with_fields, Event};
use crate::source::DEFAULT_TIMEOUT_SECS;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Outbreak registry file (optional, default: built-in outbreaks)
    #[serde(default)]
    pub registry: Option<PathBuf>,

    /// Timeout for remote fetches in seconds (optional, default 30)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Default row id column for lint reports
    #[serde(default)]
    pub id_column: Option<String>,
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: None,
            http_timeout_secs: default_http_timeout_secs(),
            id_column: None,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        log_event_with_fields(Event::ConfigLoaded, &[("path", &path.display().to_string())]);
        Ok(config)
    }

    /// Loads `path` if given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.http_timeout_secs == 0 {
            return Err(CliError::config_error("http_timeout_secs must be > 0"));
        }

        if let Some(column) = &self.id_column {
            if column.trim().is_empty() {
                return Err(CliError::config_error("id_column must not be empty"));
            }
        }

        Ok(())
    }
}
