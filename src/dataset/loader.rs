//! Linelist loader
//!
//! Parses a comma-separated payload with a header row. Every record must be
//! as wide as the header. Cells are kept verbatim.

use csv::{ErrorKind, ReaderBuilder};
use sha2::{Digest, Sha256};

use super::errors::{DatasetLoadError, DatasetResult};
use super::types::{Dataset, Row};
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::source::{Fetch, Source};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Loads linelists through a [`Fetch`] capability.
pub struct DatasetLoader<'a> {
    fetcher: &'a dyn Fetch,
}

impl<'a> DatasetLoader<'a> {
    /// Creates a loader that uses `fetcher` for remote sources.
    pub fn new(fetcher: &'a dyn Fetch) -> Self {
        Self { fetcher }
    }

    /// Reads and parses the linelist at `source`.
    pub fn load(&self, source: &Source) -> DatasetResult<Dataset> {
        let origin = source.to_string();
        let scope = ObservationScope::with_fields("DATASET_LOAD", &[("source", &origin)]);

        let result = source
            .read(self.fetcher)
            .map_err(|e| DatasetLoadError::Unreachable {
                origin: origin.clone(),
                source: e,
            })
            .and_then(|bytes| Self::parse(&bytes, &origin));

        match &result {
            Ok(dataset) => scope.complete_with_fields(&[("rows", &dataset.len().to_string())]),
            Err(e) => scope.fail(&e.to_string()),
        }
        result
    }

    /// Parses a CSV payload already in memory.
    ///
    /// `origin` names the payload in error messages.
    pub fn parse(bytes: &[u8], origin: &str) -> DatasetResult<Dataset> {
        let content_hash = format!("{:x}", Sha256::digest(bytes));
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(body);

        let header: Vec<String> = reader
            .headers()
            .map_err(|e| csv_error(origin, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| csv_error(origin, e))?;
            rows.push(Row::new(record.iter().map(str::to_string).collect()));
        }

        let dataset = Dataset::new(header, rows)
            .map_err(|column| DatasetLoadError::DuplicateColumn {
                origin: origin.to_string(),
                column,
            })?
            .with_content_hash(content_hash);

        let row_count = dataset.len().to_string();
        let column_count = dataset.header().len().to_string();
        log_event_with_fields(
            Event::DatasetLoaded,
            &[
                ("columns", &column_count),
                ("origin", origin),
                ("rows", &row_count),
                ("sha256", dataset.content_hash()),
            ],
        );

        Ok(dataset)
    }
}

fn csv_error(origin: &str, error: csv::Error) -> DatasetLoadError {
    let line = error
        .position()
        .map(|p| format!(" (line {})", p.line()))
        .unwrap_or_default();

    match error.kind() {
        ErrorKind::Utf8 { err, .. } => DatasetLoadError::Encoding {
            origin: origin.to_string(),
            reason: format!("in field {}{}", err.field() + 1, line),
        },
        ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => DatasetLoadError::Malformed {
            origin: origin.to_string(),
            reason: format!(
                "record has {} fields, header has {}{}",
                len, expected_len, line
            ),
        },
        _ => DatasetLoadError::Malformed {
            origin: origin.to_string(),
            reason: error.to_string(),
        },
    }
}
