//! Per-cell field validators
//!
//! One check per field type, selected by matching on [`FieldType`]. A check
//! never aborts the pass: it reports a [`Finding`] and the engine moves on.
//!
//! Order of checks for one cell:
//! 1. required/empty
//! 2. type parse
//! 3. constraint (range, membership, pattern)

use chrono::{NaiveDate, NaiveDateTime};

use super::violation::ViolationKind;
use crate::schema::{FieldDef, FieldType, Pattern};

/// Tokens accepted as boolean true
pub const TRUE_TOKENS: &[&str] = &["true", "True", "TRUE", "yes", "Yes", "YES", "y", "Y", "1"];

/// Tokens accepted as boolean false
pub const FALSE_TOKENS: &[&str] = &["false", "False", "FALSE", "no", "No", "NO", "n", "N", "0"];

/// A failed check, before it is placed at a row and field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub kind: ViolationKind,
    pub message: String,
}

impl Finding {
    fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Result of checking one cell
pub type CheckResult = Result<(), Finding>;

/// Checks one cell against its field definition.
///
/// `value` is `None` when the cell is empty or absent.
pub fn check_cell(field: &FieldDef, value: Option<&str>) -> CheckResult {
    match value {
        None if field.required => Err(Finding::new(
            ViolationKind::MissingRequiredField,
            "required field is empty",
        )),
        None => Ok(()),
        Some(raw) => check_value(&field.field_type, raw),
    }
}

/// Checks a non-empty value against a field type.
pub fn check_value(field_type: &FieldType, raw: &str) -> CheckResult {
    match field_type {
        FieldType::String { pattern } => check_string(pattern.as_ref(), raw),
        FieldType::Integer { min, max } => check_integer(*min, *max, raw),
        FieldType::Float { min, max } => check_float(*min, *max, raw),
        FieldType::Date { formats, .. } => check_date(formats, raw),
        FieldType::Enum { values } => check_enum(values, raw),
        FieldType::Boolean => check_boolean(raw),
    }
}

fn check_string(pattern: Option<&Pattern>, raw: &str) -> CheckResult {
    match pattern {
        Some(p) if !p.is_match(raw) => Err(Finding::new(
            ViolationKind::TypeMismatch,
            format!("'{}' does not match pattern '{}'", raw, p.as_str()),
        )),
        _ => Ok(()),
    }
}

fn check_integer(min: Option<i64>, max: Option<i64>, raw: &str) -> CheckResult {
    let value: i64 = raw.parse().map_err(|_| {
        Finding::new(
            ViolationKind::TypeMismatch,
            format!("expected integer, found '{}'", raw),
        )
    })?;
    check_range(value, min, max)
}

fn check_float(min: Option<f64>, max: Option<f64>, raw: &str) -> CheckResult {
    let value = raw
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            Finding::new(
                ViolationKind::TypeMismatch,
                format!("expected number, found '{}'", raw),
            )
        })?;
    check_range(value, min, max)
}

fn check_range<T>(value: T, min: Option<T>, max: Option<T>) -> CheckResult
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if let Some(min) = min {
        if value < min {
            return Err(Finding::new(
                ViolationKind::OutOfRange,
                format!("value {} is below minimum {}", value, min),
            ));
        }
    }
    if let Some(max) = max {
        if value > max {
            return Err(Finding::new(
                ViolationKind::OutOfRange,
                format!("value {} is above maximum {}", value, max),
            ));
        }
    }
    Ok(())
}

fn check_date(formats: &[String], raw: &str) -> CheckResult {
    match parse_date(formats, raw) {
        Some(_) => Ok(()),
        None => Err(Finding::new(
            ViolationKind::TypeMismatch,
            format!("'{}' is not a date in format {}", raw, formats.join(" or ")),
        )),
    }
}

/// Parses `raw` with the first accepted format that fits.
///
/// Formats with time components are parsed as date-times and truncated.
pub fn parse_date(formats: &[String], raw: &str) -> Option<NaiveDate> {
    formats.iter().find_map(|format| {
        NaiveDate::parse_from_str(raw, format)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, format).map(|dt| dt.date()))
            .ok()
    })
}

fn check_enum(values: &[String], raw: &str) -> CheckResult {
    if values.iter().any(|v| v == raw) {
        Ok(())
    } else {
        Err(Finding::new(
            ViolationKind::InvalidEnumValue,
            format!("'{}' is not one of: {}", raw, values.join(", ")),
        ))
    }
}

fn check_boolean(raw: &str) -> CheckResult {
    if TRUE_TOKENS.contains(&raw) || FALSE_TOKENS.contains(&raw) {
        Ok(())
    } else {
        Err(Finding::new(
            ViolationKind::TypeMismatch,
            format!("expected boolean (true/false, yes/no, y/n, 1/0), found '{}'", raw),
        ))
    }
}

/// Cross-field check: `date` must not precede `earlier`, the date in `earlier_field`.
pub fn check_not_before(date: NaiveDate, earlier_field: &str, earlier: NaiveDate) -> CheckResult {
    if date < earlier {
        Err(Finding::new(
            ViolationKind::OutOfRange,
            format!("date {} is before {} ({})", date, earlier_field, earlier),
        ))
    } else {
        Ok(())
    }
}
