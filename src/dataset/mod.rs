//! Linelist datasets
//!
//! A linelist is one row per case under a shared header. Loading preserves
//! column order and raw cell text.

mod errors;
mod loader;
mod types;

pub use errors::{DatasetLoadError, DatasetResult};
pub use loader::DatasetLoader;
pub use types::{Dataset, Row};
