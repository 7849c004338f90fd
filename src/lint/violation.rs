//! Violations and validation results
//!
//! Violations are created once during the validation pass and never mutated.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a failed check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Required field left empty
    MissingRequiredField,
    /// Value does not parse as the declared type
    TypeMismatch,
    /// Value parses but lies outside its allowed range
    OutOfRange,
    /// Value is not a member of the enum set
    InvalidEnumValue,
    /// Column present in the linelist but not declared
    UnknownField,
    /// Column declared but absent from the linelist
    MissingColumn,
}

impl ViolationKind {
    /// Returns the kind name
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::MissingRequiredField => "MissingRequiredField",
            ViolationKind::TypeMismatch => "TypeMismatch",
            ViolationKind::OutOfRange => "OutOfRange",
            ViolationKind::InvalidEnumValue => "InvalidEnumValue",
            ViolationKind::UnknownField => "UnknownField",
            ViolationKind::MissingColumn => "MissingColumn",
        }
    }

    /// Returns true for kinds reported against the linelist as a whole
    pub fn is_dataset_level(&self) -> bool {
        matches!(self, ViolationKind::UnknownField | ViolationKind::MissingColumn)
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One failed check
///
/// Fields are declared in key order so serialized reports have sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Field (column) the check concerns
    pub field_name: String,
    /// Human-readable detail
    pub message: String,
    /// Offending cell text, for cell-level violations
    pub raw_value: Option<String>,
    /// Value of the id column for the row, when one was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_id: Option<String>,
    /// 0-based row position; `None` for dataset-level violations
    pub row_index: Option<usize>,
    /// Category of the failed check
    pub violation_kind: ViolationKind,
}

impl Violation {
    /// A violation tied to one cell
    pub fn cell(
        row_index: usize,
        field_name: impl Into<String>,
        kind: ViolationKind,
        message: impl Into<String>,
        raw_value: Option<&str>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            message: message.into(),
            raw_value: raw_value.map(str::to_string),
            row_id: None,
            row_index: Some(row_index),
            violation_kind: kind,
        }
    }

    /// A violation about a column of the linelist as a whole
    pub fn dataset(field_name: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            message: message.into(),
            raw_value: None,
            row_id: None,
            row_index: None,
            violation_kind: kind,
        }
    }

    /// Attaches the row identifier
    pub fn with_row_id(mut self, row_id: Option<&str>) -> Self {
        self.row_id = row_id.map(str::to_string);
        self
    }

    /// Returns true if this is not tied to a row
    pub fn is_dataset_level(&self) -> bool {
        self.row_index.is_none()
    }
}

/// Outcome of one validation pass
///
/// `ok` is true iff `violations` is empty. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    ok: bool,
    violations: Vec<Violation>,
}

impl ValidationResult {
    /// Wraps the final, already filtered, violation sequence
    pub fn new(violations: Vec<Violation>) -> Self {
        Self {
            ok: violations.is_empty(),
            violations,
        }
    }

    /// True iff no violations were found
    pub fn ok(&self) -> bool {
        self.ok
    }

    /// Violations in row-then-column order, dataset-level last
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Number of violations
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations of `kind`
    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations
            .iter()
            .filter(|v| v.violation_kind == kind)
            .count()
    }

    /// Consumes the result and returns the violations
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}
