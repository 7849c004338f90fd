//! Lint run errors
//!
//! Only load failures abort a run. Violations are never errors: they are
//! accumulated into the [`ValidationResult`](super::ValidationResult).

use thiserror::Error;

use crate::dataset::DatasetLoadError;
use crate::schema::SchemaLoadError;
use crate::source::FetchError;

/// Result type for lint runs
pub type LintResult<T> = Result<T, LintError>;

/// Fatal failure of a lint run
#[derive(Debug, Error)]
pub enum LintError {
    /// The schema could not be loaded
    #[error(transparent)]
    Schema(#[from] SchemaLoadError),

    /// The linelist could not be loaded
    #[error(transparent)]
    Dataset(#[from] DatasetLoadError),

    /// The default HTTP client could not be built
    #[error(transparent)]
    Client(FetchError),
}

impl LintError {
    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            LintError::Schema(_) => "OLM_SCHEMA_LOAD_FAILED",
            LintError::Dataset(_) => "OLM_DATASET_LOAD_FAILED",
            LintError::Client(_) => "OLM_HTTP_CLIENT_FAILED",
        }
    }

    /// Code of the underlying loader error
    pub fn detail_code(&self) -> &'static str {
        match self {
            LintError::Schema(e) => e.code(),
            LintError::Dataset(e) => e.code(),
            LintError::Client(e) => e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_is_transparent() {
        let err: LintError = SchemaLoadError::Invalid {
            origin: "s.json".into(),
            reason: "duplicate field name 'ID'".into(),
        }
        .into();
        assert_eq!(err.code(), "OLM_SCHEMA_LOAD_FAILED");
        assert_eq!(err.detail_code(), "OLM_SCHEMA_INVALID");
        assert!(err.to_string().starts_with("cannot load schema"));
    }

    #[test]
    fn test_dataset_error_is_transparent() {
        let err: LintError = DatasetLoadError::DuplicateColumn {
            origin: "cases.csv".into(),
            column: "ID".into(),
        }
        .into();
        assert_eq!(err.code(), "OLM_DATASET_LOAD_FAILED");
        assert!(err.to_string().starts_with("cannot load dataset"));
    }

    #[test]
    fn test_client_error_is_transparent() {
        let err = LintError::Client(FetchError::Client {
            reason: "no TLS backend".into(),
        });
        assert_eq!(err.code(), "OLM_HTTP_CLIENT_FAILED");
        assert_eq!(err.detail_code(), "OLM_FETCH_CLIENT");
        assert_eq!(err.to_string(), "cannot create HTTP client: no TLS backend");
    }
}
