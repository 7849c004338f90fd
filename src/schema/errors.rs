//! Schema load errors
//!
//! Every variant is fatal to a lint run: no partial result is produced.

use thiserror::Error;

use crate::source::FetchError;

/// Result type for schema loading
pub type SchemaResult<T> = Result<T, SchemaLoadError>;

/// Failure to turn a schema source into a [`Schema`](super::Schema)
#[derive(Debug, Error)]
pub enum SchemaLoadError {
    /// The schema bytes could not be obtained
    #[error("cannot load schema '{origin}': {source}")]
    Unreachable {
        origin: String,
        #[source]
        source: FetchError,
    },

    /// The document is not valid JSON or does not match the schema format
    #[error("cannot load schema '{origin}': malformed document: {reason}")]
    Malformed { origin: String, reason: String },

    /// The document parsed but describes an inconsistent schema
    #[error("cannot load schema '{origin}': {reason}")]
    Invalid { origin: String, reason: String },

    /// A JSON Schema property uses a construct with no field-type equivalent
    #[error("cannot load schema '{origin}': property '{property}': {reason}")]
    Unsupported {
        origin: String,
        property: String,
        reason: String,
    },
}

impl SchemaLoadError {
    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            SchemaLoadError::Unreachable { .. } => "OLM_SCHEMA_UNREACHABLE",
            SchemaLoadError::Malformed { .. } => "OLM_SCHEMA_MALFORMED",
            SchemaLoadError::Invalid { .. } => "OLM_SCHEMA_INVALID",
            SchemaLoadError::Unsupported { .. } => "OLM_SCHEMA_UNSUPPORTED",
        }
    }

    pub(crate) fn malformed(origin: &str, reason: impl Into<String>) -> Self {
        SchemaLoadError::Malformed {
            origin: origin.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(origin: &str, property: &str, reason: impl Into<String>) -> Self {
        SchemaLoadError::Unsupported {
            origin: origin.to_string(),
            property: property.to_string(),
            reason: reason.into(),
        }
    }
}
