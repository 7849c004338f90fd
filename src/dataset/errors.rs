//! Linelist load errors
//!
//! Every variant is fatal to a lint run: no partial result is produced.

use thiserror::Error;

use crate::source::FetchError;

/// Result type for linelist loading
pub type DatasetResult<T> = Result<T, DatasetLoadError>;

/// Failure to turn a linelist source into a [`Dataset`](super::Dataset)
#[derive(Debug, Error)]
pub enum DatasetLoadError {
    /// The linelist bytes could not be obtained
    #[error("cannot load dataset '{origin}': {source}")]
    Unreachable {
        origin: String,
        #[source]
        source: FetchError,
    },

    /// The payload is not valid UTF-8
    #[error("cannot load dataset '{origin}': invalid UTF-8 {reason}")]
    Encoding { origin: String, reason: String },

    /// The payload is not a well-formed table
    #[error("cannot load dataset '{origin}': malformed CSV: {reason}")]
    Malformed { origin: String, reason: String },

    /// The header names the same column twice
    #[error("cannot load dataset '{origin}': duplicate column '{column}'")]
    DuplicateColumn { origin: String, column: String },
}

impl DatasetLoadError {
    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            DatasetLoadError::Unreachable { .. } => "OLM_DATASET_UNREACHABLE",
            DatasetLoadError::Encoding { .. } => "OLM_DATASET_ENCODING",
            DatasetLoadError::Malformed { .. } => "OLM_DATASET_MALFORMED",
            DatasetLoadError::DuplicateColumn { .. } => "OLM_DATASET_DUPLICATE_COLUMN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_column_display() {
        let err = DatasetLoadError::DuplicateColumn {
            origin: "cases.csv".into(),
            column: "Age".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot load dataset 'cases.csv': duplicate column 'Age'"
        );
        assert_eq!(err.code(), "OLM_DATASET_DUPLICATE_COLUMN");
    }
}
