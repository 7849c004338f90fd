//! Validation engine
//!
//! Validation semantics:
//! - Every row and every declared field is checked; nothing short-circuits
//!   across cells
//! - Ignored field names produce no violations at all
//! - A declared column absent from the header yields one `MissingColumn`
//!   and no per-row violations for that field
//! - An undeclared header column yields one `UnknownField`
//! - A linelist with no rows has no dataset-level violations
//! - Output order: row violations (row, then schema order), then
//!   `MissingColumn` (schema order), then `UnknownField` (header order)
//!
//! [`validate_with_options`] is a pure function of (schema, dataset, options)
//! and emits nothing. [`Linter::check`] wraps it with the run's log events.

use std::thread;

use super::errors::{LintError, LintResult};
use super::ignore::IgnoreList;
use super::validators::{check_cell, check_not_before, parse_date};
use super::violation::{ValidationResult, Violation, ViolationKind};
use crate::dataset::{Dataset, DatasetLoader, Row};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{FieldDef, FieldType, Schema, SchemaLoader};
use crate::source::{Fetch, HttpFetcher, Source};

/// Options for one lint run
#[derive(Debug, Clone, Default)]
pub struct LintOptions {
    /// Field names excluded from reporting
    pub ignore: IgnoreList,
    /// Column whose value identifies a row in reports
    pub id_column: Option<String>,
}

impl LintOptions {
    /// Options with only an ignore-list
    pub fn with_ignore(ignore: IgnoreList) -> Self {
        Self {
            ignore,
            id_column: None,
        }
    }
}

/// Validates a loaded linelist against a loaded schema.
pub fn validate(schema: &Schema, dataset: &Dataset, ignore: &IgnoreList) -> ValidationResult {
    validate_with_options(schema, dataset, &LintOptions::with_ignore(ignore.clone()))
}

/// Per-field lookup resolved once before the row pass
struct FieldPlan<'s> {
    field: &'s FieldDef,
    column: Option<usize>,
    /// `(earlier field name, its formats, its column)` for `not_before`
    earlier: Option<(&'s str, &'s [String], Option<usize>)>,
}

fn plan<'s>(schema: &'s Schema, dataset: &Dataset) -> Vec<FieldPlan<'s>> {
    schema
        .fields
        .iter()
        .map(|field| {
            let earlier = match &field.field_type {
                FieldType::Date {
                    not_before: Some(other),
                    ..
                } => schema.field(other).and_then(|def| match &def.field_type {
                    FieldType::Date { formats, .. } => Some((
                        def.name.as_str(),
                        formats.as_slice(),
                        dataset.column_index(&def.name),
                    )),
                    _ => None,
                }),
                _ => None,
            };

            FieldPlan {
                field,
                column: dataset.column_index(&field.name),
                earlier,
            }
        })
        .collect()
}

/// Validates with full options.
pub fn validate_with_options(
    schema: &Schema,
    dataset: &Dataset,
    options: &LintOptions,
) -> ValidationResult {
    let plans: Vec<FieldPlan<'_>> = plan(schema, dataset)
        .into_iter()
        .filter(|p| !options.ignore.contains(&p.field.name))
        .collect();
    let id_column = options
        .id_column
        .as_deref()
        .and_then(|c| dataset.column_index(c));

    let mut violations = Vec::new();

    for (row_index, row) in dataset.rows().iter().enumerate() {
        let row_id = id_column.and_then(|i| row.cell(i));
        for p in &plans {
            if let Some(v) = check_row_field(schema, row, row_index, p) {
                violations.push(v.with_row_id(row_id));
            }
        }
    }

    // A zero-row linelist has no row lacking or carrying any column.
    if !dataset.is_empty() {
        for p in plans.iter().filter(|p| p.column.is_none()) {
            violations.push(Violation::dataset(
                &p.field.name,
                ViolationKind::MissingColumn,
                "declared column is not present in the dataset",
            ));
        }

        for column in dataset.header() {
            if !schema.declares(column) && !options.ignore.contains(column) {
                violations.push(Violation::dataset(
                    column,
                    ViolationKind::UnknownField,
                    "column is not declared in the schema",
                ));
            }
        }
    }

    ValidationResult::new(violations)
}

fn check_row_field(
    schema: &Schema,
    row: &Row,
    row_index: usize,
    p: &FieldPlan<'_>,
) -> Option<Violation> {
    let column = p.column?;
    let raw = row.cell(column);
    let value = raw.filter(|r| !schema.is_missing(r));
    let name = &p.field.name;

    if let Err(finding) = check_cell(p.field, value) {
        return Some(Violation::cell(row_index, name, finding.kind, finding.message, raw));
    }

    let (value, (earlier_name, earlier_formats, earlier_column)) = (value?, p.earlier?);
    let FieldType::Date { formats, .. } = &p.field.field_type else {
        return None;
    };
    let date = parse_date(formats, value)?;
    let earlier = earlier_column
        .and_then(|i| row.cell(i))
        .filter(|r| !schema.is_missing(r))
        .and_then(|r| parse_date(earlier_formats, r))?;

    check_not_before(date, earlier_name, earlier)
        .err()
        .map(|finding| Violation::cell(row_index, name, finding.kind, finding.message, raw))
}

/// Loads a schema and a linelist and validates one against the other.
///
/// The two loads are independent and run on separate threads.
pub struct Linter<'a> {
    fetcher: &'a dyn Fetch,
    options: LintOptions,
}

impl<'a> Linter<'a> {
    /// Creates a linter with default options
    pub fn new(fetcher: &'a dyn Fetch) -> Self {
        Self::with_options(fetcher, LintOptions::default())
    }

    /// Creates a linter with explicit options
    pub fn with_options(fetcher: &'a dyn Fetch, options: LintOptions) -> Self {
        Self { fetcher, options }
    }

    /// Loads both inputs. A schema failure is reported before a dataset failure.
    pub fn load(&self, dataset_source: &Source, schema_source: &Source) -> LintResult<(Schema, Dataset)> {
        let fetcher = self.fetcher;
        let (schema, dataset) = thread::scope(|s| {
            let schema = s.spawn(move || SchemaLoader::new(fetcher).load(schema_source));
            let dataset = DatasetLoader::new(fetcher).load(dataset_source);
            let schema = schema
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            (schema, dataset)
        });

        Ok((schema?, dataset?))
    }

    /// Validates loaded inputs with this linter's options and logs the outcome.
    pub fn check(&self, schema: &Schema, dataset: &Dataset) -> ValidationResult {
        for name in self.options.ignore.iter().filter(|n| !schema.declares(n)) {
            log_event_with_fields(Event::IgnoreUnknownField, &[("field", name)]);
        }

        let result = validate_with_options(schema, dataset, &self.options);

        let rows = dataset.len().to_string();
        let count = result.len().to_string();
        let event = if result.ok() {
            Event::LintPassed
        } else {
            Event::LintFailed
        };
        log_event_with_fields(event, &[("rows", &rows), ("violations", &count)]);

        result
    }

    /// Loads and validates.
    pub fn lint(&self, dataset_source: &Source, schema_source: &Source) -> LintResult<ValidationResult> {
        let (schema, dataset) = self.load(dataset_source, schema_source)?;
        Ok(self.check(&schema, &dataset))
    }
}

/// Lints the linelist at `dataset_source` against the schema at `schema_source`.
///
/// Remote sources are fetched with a default [`HttpFetcher`].
pub fn lint(
    dataset_source: &Source,
    schema_source: &Source,
    ignore_fields: &IgnoreList,
) -> LintResult<ValidationResult> {
    let fetcher = HttpFetcher::new().map_err(LintError::Client)?;
    Linter::with_options(&fetcher, LintOptions::with_ignore(ignore_fields.clone()))
        .lint(dataset_source, schema_source)
}
