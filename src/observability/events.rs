//! Observable events for olm
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events during an olm invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded
    ConfigLoaded,
    /// Outbreak registry loaded
    RegistryLoaded,

    // Sources
    /// Remote fetch issued
    FetchStart,
    /// Remote fetch returned a payload
    FetchComplete,

    // Loaders
    /// Schema parsed into the in-memory model
    SchemaLoaded,
    /// Linelist parsed into rows
    DatasetLoaded,

    // Linting
    /// Ignore-list names a field the schema does not declare
    IgnoreUnknownField,
    /// Validation pass finished
    LintPassed,
    /// Validation pass finished with violations
    LintFailed,

    // Output
    /// Linelist written to disk by `get`
    DatasetWritten,
}

impl Event {
    /// Returns the string representation for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::RegistryLoaded => "REGISTRY_LOADED",
            Event::FetchStart => "FETCH_START",
            Event::FetchComplete => "FETCH_COMPLETE",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::DatasetLoaded => "DATASET_LOADED",
            Event::IgnoreUnknownField => "IGNORE_UNKNOWN_FIELD",
            Event::LintPassed => "LINT_PASSED",
            Event::LintFailed => "LINT_FAILED",
            Event::DatasetWritten => "DATASET_WRITTEN",
        }
    }

    /// Returns whether this event is logged above INFO
    pub fn is_warning(&self) -> bool {
        matches!(self, Event::IgnoreUnknownField | Event::LintFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
