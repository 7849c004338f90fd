//! Registry error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Failure to load or query the outbreak registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot read registry {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid registry {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("invalid outbreak name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("unknown outbreak '{name}', known outbreaks: {}", .known.join(", "))]
    UnknownOutbreak { name: String, known: Vec<String> },
}

impl RegistryError {
    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::Io { .. } => "OLM_REGISTRY_IO",
            RegistryError::Malformed { .. } => "OLM_REGISTRY_MALFORMED",
            RegistryError::InvalidName { .. } => "OLM_REGISTRY_INVALID_NAME",
            RegistryError::UnknownOutbreak { .. } => "OLM_REGISTRY_UNKNOWN_OUTBREAK",
        }
    }
}
