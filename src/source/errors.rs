//! Errors raised while obtaining raw bytes for a schema or linelist

use std::path::PathBuf;

use thiserror::Error;

/// Result type for fetch and read operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Failure to obtain the bytes behind a [`Source`](super::Source)
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, connection, timeout)
    #[error("network error fetching '{url}': {reason}")]
    Network { url: String, reason: String },

    /// Server answered with a non-success status
    #[error("fetching '{url}' returned status {status}")]
    Status { url: String, status: u16 },

    /// The HTTP client itself could not be built; no request was made
    #[error("cannot create HTTP client: {reason}")]
    Client { reason: String },

    /// Local file could not be read
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            FetchError::Network { .. } => "OLM_FETCH_NETWORK",
            FetchError::Status { .. } => "OLM_FETCH_STATUS",
            FetchError::Client { .. } => "OLM_FETCH_CLIENT",
            FetchError::Io { .. } => "OLM_FETCH_IO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = FetchError::Status {
            url: "https://example.org/latest.csv".into(),
            status: 404,
        };
        let display = err.to_string();
        assert!(display.contains("404"));
        assert!(display.contains("latest.csv"));
        assert_eq!(err.code(), "OLM_FETCH_STATUS");
    }

    #[test]
    fn test_io_display_includes_path() {
        let err = FetchError::Io {
            path: PathBuf::from("/no/such/cases.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/no/such/cases.csv"));
        assert_eq!(err.code(), "OLM_FETCH_IO");
    }

    #[test]
    fn test_client_display_has_no_url() {
        let err = FetchError::Client {
            reason: "no TLS backend".into(),
        };
        assert_eq!(err.to_string(), "cannot create HTTP client: no TLS backend");
        assert!(!err.to_string().contains("''"));
        assert_eq!(err.code(), "OLM_FETCH_CLIENT");
    }
}
