//! Where schemas and linelists come from
//!
//! A [`Source`] is either a local path or a remote URL. Local sources are
//! read straight from disk; remote sources go through a [`Fetch`]
//! implementation so callers and tests can substitute their own transport.

mod errors;
mod http;

use std::fmt;
use std::fs;
use std::path::PathBuf;

pub use errors::{FetchError, FetchResult};
pub use http::{HttpFetcher, DEFAULT_TIMEOUT_SECS};

/// Capability to retrieve the bytes behind a URL.
///
/// Must be shareable across threads: the schema and the linelist are
/// loaded concurrently.
pub trait Fetch: Send + Sync {
    /// Retrieve the full body at `url`.
    fn fetch(&self, url: &str) -> FetchResult<Vec<u8>>;
}

/// Location of a schema or linelist
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Filesystem path
    Path(PathBuf),
    /// `http://` or `https://` URL
    Url(String),
}

impl Source {
    /// Classifies a user-supplied location.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Source::Url(location.to_string())
        } else {
            Source::Path(PathBuf::from(location))
        }
    }

    /// Returns true for remote sources.
    pub fn is_remote(&self) -> bool {
        matches!(self, Source::Url(_))
    }

    /// Reads the full payload.
    pub fn read(&self, fetcher: &dyn Fetch) -> FetchResult<Vec<u8>> {
        match self {
            Source::Path(path) => fs::read(path).map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            }),
            Source::Url(url) => fetcher.fetch(url),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Url(url) => write!(f, "{}", url),
        }
    }
}

impl From<&str> for Source {
    fn from(location: &str) -> Self {
        Source::parse(location)
    }
}
