//! Blocking HTTP/HTTPS fetcher.

use std::time::Duration;

use reqwest::blocking::Client;

use super::errors::{FetchError, FetchResult};
use super::Fetch;
use crate::observability::{log_event_with_fields, Event};

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A [`Fetch`] implementation backed by a blocking `reqwest` client.
///
/// A single failed request is surfaced immediately; there are no retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> FetchResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a fetcher whose requests time out after `timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_timeout(timeout_secs: u64) -> FetchResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("olm/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FetchError::Client {
                reason: e.to_string(),
            })?;

        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> FetchResult<Vec<u8>> {
        log_event_with_fields(Event::FetchStart, &[("url", url)]);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().map_err(|e| FetchError::Network {
            url: url.to_string(),
            reason: format!("failed to read response body: {e}"),
        })?;

        let size = bytes.len().to_string();
        log_event_with_fields(Event::FetchComplete, &[("url", url), ("bytes", &size)]);

        Ok(bytes.to_vec())
    }
}
