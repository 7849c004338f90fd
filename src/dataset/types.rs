//! In-memory linelist
//!
//! Cells are kept as the exact text found in the payload so violations can
//! quote the offending value. No coercion happens here.

use std::collections::HashMap;

/// One case: raw cell values in header order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    /// Create a row from its cells
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Cell at a header position
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

/// A linelist: shared header plus rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    header: Vec<String>,
    columns: HashMap<String, usize>,
    rows: Vec<Row>,
    content_hash: String,
}

impl Dataset {
    /// Builds a dataset from a header and rows.
    ///
    /// Returns the first duplicated column name on failure. Rows are
    /// expected to be as wide as the header; missing trailing cells read as
    /// absent.
    pub fn new(header: Vec<String>, rows: Vec<Row>) -> Result<Self, String> {
        let mut columns = HashMap::with_capacity(header.len());
        for (index, name) in header.iter().enumerate() {
            if columns.insert(name.clone(), index).is_some() {
                return Err(name.clone());
            }
        }

        Ok(Self {
            header,
            columns,
            rows,
            content_hash: String::new(),
        })
    }

    /// Convenience constructor for in-memory tables
    pub fn from_records<H, R, C>(header: H, records: R) -> Result<Self, String>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let header = header.into_iter().map(Into::into).collect();
        let rows = records
            .into_iter()
            .map(|record| Row::new(record.into_iter().map(Into::into).collect()))
            .collect();
        Self::new(header, rows)
    }

    pub(crate) fn with_content_hash(mut self, hash: String) -> Self {
        self.content_hash = hash;
        self
    }

    /// Column names in payload order
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Position of `column` in the header
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.get(column).copied()
    }

    /// Returns true if the header carries `column`
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// All rows in payload order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw value of `column` in row `row`
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.cell(index)
    }

    /// Lowercase hex SHA-256 of the payload; empty for in-memory tables
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }
}
