//! olm - checks outbreak linelists against a declared schema
//!
//! A linelist (CSV, one row per case) is validated field by field against
//! its schema. Every failed check becomes a [`Violation`]; the run never
//! stops at the first one. Only a schema or linelist that cannot be loaded
//! aborts a run.

pub mod cli;
pub mod dataset;
pub mod lint;
pub mod observability;
pub mod registry;
pub mod schema;
pub mod source;

pub use dataset::{Dataset, DatasetLoadError};
pub use lint::{lint, validate, IgnoreList, LintError, ValidationResult, Violation, ViolationKind};
pub use registry::{OutbreakInfo, OutbreakRegistry};
pub use schema::{FieldDef, FieldType, Schema, SchemaLoadError};
pub use source::{Fetch, Source};
