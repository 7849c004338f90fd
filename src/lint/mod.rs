//! Linelist linting
//!
//! The validation pass runs every declared field of every row through its
//! type's validator and accumulates [`Violation`]s. Only loader failures
//! abort a run; see [`LintError`].

mod engine;
mod errors;
mod ignore;
mod report;
mod validators;
mod violation;

pub use engine::{lint, validate, validate_with_options, LintOptions, Linter};
pub use errors::{LintError, LintResult};
pub use ignore::IgnoreList;
pub use report::{render_json, render_text, LintReport};
pub use validators::{
    check_cell, check_not_before, check_value, parse_date, CheckResult, Finding, FALSE_TOKENS,
    TRUE_TOKENS,
};
pub use violation::{ValidationResult, Violation, ViolationKind};
