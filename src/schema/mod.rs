//! Schema subsystem for olm
//!
//! A schema is an ordered list of field definitions describing the columns a
//! linelist is expected to carry, their types and their constraints.
//!
//! # Design Principles
//!
//! - Field names are unique within a schema
//! - Field types form a closed set, each carrying its own constraints
//! - A schema is read-only once loaded

mod errors;
mod json_schema;
mod loader;
mod types;

pub use errors::{SchemaLoadError, SchemaResult};
pub use json_schema::{from_json_schema, is_json_schema};
pub use loader::SchemaLoader;
pub use types::{FieldDef, FieldType, Pattern, Schema, DEFAULT_DATE_FORMAT};
