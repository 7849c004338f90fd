//! Report rendering
//!
//! Both renderings are pure and keep the violation order of the
//! [`ValidationResult`]: row-then-column, dataset-level last.

use std::fmt;

use serde::Serialize;

use super::violation::{ValidationResult, Violation};

/// Renders a human-readable report.
///
/// ```text
/// 2 issue(s) found
/// row 0 field 'Age': OutOfRange: value 150 is above maximum 120 (found: "150")
/// dataset field 'Extra': UnknownField: column is not declared in the schema
/// ```
pub fn render_text(result: &ValidationResult) -> String {
    result.to_string()
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ok() {
            return f.write_str("no issues found");
        }

        write!(f, "{} issue(s) found", self.len())?;
        for violation in self.violations() {
            write!(f, "\n{}", violation)?;
        }
        Ok(())
    }
}

/// One report line, without a trailing newline
impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row_index {
            Some(index) => write!(f, "row {}", index)?,
            None => f.write_str("dataset")?,
        }
        if let Some(id) = &self.row_id {
            write!(f, " (id {})", id)?;
        }
        write!(
            f,
            " field '{}': {}: {}",
            self.field_name, self.violation_kind, self.message
        )?;
        if let Some(raw) = self.raw_value.as_deref().filter(|r| !r.is_empty()) {
            write!(f, " (found: {:?})", raw)?;
        }
        Ok(())
    }
}

/// Machine-readable report of one lint run
///
/// Fields are declared in key order so the JSON keys come out sorted.
#[derive(Debug, Clone, Serialize)]
pub struct LintReport<'r> {
    /// Violations, in report order
    pub errors: &'r [Violation],
    /// SHA-256 of the linelist bytes, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filehash: Option<String>,
    /// True iff `errors` is empty
    pub ok: bool,
    /// Outbreak name, or the dataset location when linting ad hoc
    pub outbreak: String,
    /// Location of the schema used
    pub schema: String,
}

impl<'r> LintReport<'r> {
    pub fn new(
        outbreak: impl Into<String>,
        schema: impl Into<String>,
        filehash: Option<String>,
        result: &'r ValidationResult,
    ) -> Self {
        Self {
            errors: result.violations(),
            filehash,
            ok: result.ok(),
            outbreak: outbreak.into(),
            schema: schema.into(),
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Renders a machine-readable report.
pub fn render_json(report: &LintReport<'_>) -> serde_json::Result<String> {
    report.to_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::ViolationKind;

    fn sample() -> ValidationResult {
        ValidationResult::new(vec![
            Violation::cell(
                0,
                "Age",
                ViolationKind::OutOfRange,
                "value 150 is above maximum 120",
                Some("150"),
            ),
            Violation::cell(
                1,
                "ID",
                ViolationKind::MissingRequiredField,
                "required field is empty",
                Some(""),
            )
            .with_row_id(Some("C-2")),
            Violation::dataset(
                "Extra",
                ViolationKind::UnknownField,
                "column is not declared in the schema",
            ),
        ])
    }

    #[test]
    fn test_render_success() {
        let result = ValidationResult::new(vec![]);
        assert_eq!(render_text(&result), "no issues found");
        assert_eq!(result.to_string(), "no issues found");
    }

    #[test]
    fn test_render_lines() {
        let text = render_text(&sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "3 issue(s) found",
                "row 0 field 'Age': OutOfRange: value 150 is above maximum 120 (found: \"150\")",
                "row 1 (id C-2) field 'ID': MissingRequiredField: required field is empty",
                "dataset field 'Extra': UnknownField: column is not declared in the schema",
            ]
        );
    }

    #[test]
    fn test_violation_display() {
        let result = sample();
        let [age, id, extra] = result.violations() else {
            panic!("expected three violations");
        };
        assert_eq!(
            age.to_string(),
            "row 0 field 'Age': OutOfRange: value 150 is above maximum 120 (found: \"150\")"
        );
        assert!(!id.to_string().contains("found"));
        assert!(extra.to_string().starts_with("dataset field 'Extra'"));
        assert!(!age.to_string().ends_with('\n'));
    }

    #[test]
    fn test_render_is_deterministic() {
        let result = sample();
        assert_eq!(render_text(&result), render_text(&result.clone()));
    }

    #[test]
    fn test_json_report() {
        let result = sample();
        let report = LintReport::new("marburg", "schema.json", Some("abc".into()), &result);
        let json = render_json(&report).unwrap();

        let keys: Vec<usize> = ["\"errors\"", "\"filehash\"", "\"ok\"", "\"outbreak\"", "\"schema\""]
            .iter()
            .map(|k| json.find(k).unwrap())
            .collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["errors"].as_array().unwrap().len(), 3);
        assert_eq!(value["errors"][1]["row_id"], "C-2");
        assert!(value["errors"][2]["row_index"].is_null());
    }
}
