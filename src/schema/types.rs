//! Schema type definitions
//!
//! Supported field types:
//! - string: free text, optionally matched against a regex pattern
//! - integer: 64-bit signed integer with optional inclusive range
//! - float: finite 64-bit float with optional inclusive range
//! - date: calendar date in one of several accepted formats
//! - enum: member of a fixed, case-sensitive value set
//! - boolean: one of a fixed set of true/false tokens

use std::collections::HashSet;
use std::fmt;

use chrono::format::{Item, StrftimeItems};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Date format used when a date field does not list its own
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

fn default_date_formats() -> Vec<String> {
    vec![DEFAULT_DATE_FORMAT.to_string()]
}

/// A compiled regular expression carried by string fields
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern(Regex);

impl Pattern {
    /// Compiles a pattern
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Pattern)
    }

    /// Unanchored search, as JSON Schema `pattern` behaves
    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }

    /// Returns the source text of the pattern
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Pattern {
    type Error = regex::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Pattern::new(&value)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.as_str().to_string()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

/// Field type with its type-specific constraints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// Free text
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<Pattern>,
    },
    /// 64-bit signed integer
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    /// Finite 64-bit float
    Float {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Calendar date
    Date {
        /// chrono strftime formats, tried in order
        #[serde(default = "default_date_formats")]
        formats: Vec<String>,
        /// Another date field this one must not precede
        #[serde(default, skip_serializing_if = "Option::is_none")]
        not_before: Option<String>,
    },
    /// Member of a fixed value set
    Enum { values: Vec<String> },
    /// True/false token
    Boolean,
}

impl FieldType {
    /// Returns the type name for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String { .. } => "string",
            FieldType::Integer { .. } => "integer",
            FieldType::Float { .. } => "float",
            FieldType::Date { .. } => "date",
            FieldType::Enum { .. } => "enum",
            FieldType::Boolean => "boolean",
        }
    }

    /// Unconstrained string
    pub fn string() -> Self {
        FieldType::String { pattern: None }
    }

    /// Date in the default format
    pub fn date() -> Self {
        FieldType::Date {
            formats: default_date_formats(),
            not_before: None,
        }
    }
}

/// One expected column of a linelist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Column header this field matches
    pub name: String,
    /// Field data type and constraints
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether every row must carry a non-empty value
    #[serde(default)]
    pub required: bool,
}

impl FieldDef {
    /// Create an optional field
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
        }
    }

    /// Marks the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Create an optional string field
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::string())
    }

    /// Create an optional string field with a pattern
    pub fn string_matching(name: impl Into<String>, pattern: Pattern) -> Self {
        Self::new(
            name,
            FieldType::String {
                pattern: Some(pattern),
            },
        )
    }

    /// Create an optional integer field with an inclusive range
    pub fn integer(name: impl Into<String>, min: Option<i64>, max: Option<i64>) -> Self {
        Self::new(name, FieldType::Integer { min, max })
    }

    /// Create an optional float field with an inclusive range
    pub fn float(name: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        Self::new(name, FieldType::Float { min, max })
    }

    /// Create an optional date field in the default format
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::date())
    }

    /// Create an optional enum field
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            FieldType::Enum {
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Create an optional boolean field
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }
}

/// Declared layout of a linelist: an ordered sequence of fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema identifier, usually the outbreak id
    #[serde(default)]
    pub schema_id: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Cell tokens treated as empty in addition to ""
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_values: Vec<String>,
    /// Field definitions, in declaration order
    pub fields: Vec<FieldDef>,
}

impl Schema {
    /// Create a new schema
    pub fn new(schema_id: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            schema_id: schema_id.into(),
            description: None,
            missing_values: Vec::new(),
            fields,
        }
    }

    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns true if the schema declares `name`
    pub fn declares(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns true if `raw` counts as an empty cell
    pub fn is_missing(&self, raw: &str) -> bool {
        raw.is_empty() || self.missing_values.iter().any(|m| m == raw)
    }

    /// Validates the schema structure itself (not a linelist)
    pub fn validate_structure(&self) -> Result<(), String> {
        let mut seen = HashSet::new();

        for field in &self.fields {
            if field.name.is_empty() {
                return Err("field names must not be empty".into());
            }
            if !seen.insert(field.name.as_str()) {
                return Err(format!("duplicate field name '{}'", field.name));
            }

            match &field.field_type {
                FieldType::Integer {
                    min: Some(min),
                    max: Some(max),
                } if min > max => {
                    return Err(format!(
                        "field '{}': min {} is greater than max {}",
                        field.name, min, max
                    ));
                }
                FieldType::Float { min, max } => {
                    if min.is_some_and(|v| !v.is_finite()) || max.is_some_and(|v| !v.is_finite()) {
                        return Err(format!("field '{}': range bounds must be finite", field.name));
                    }
                    if let (Some(min), Some(max)) = (min, max) {
                        if min > max {
                            return Err(format!(
                                "field '{}': min {} is greater than max {}",
                                field.name, min, max
                            ));
                        }
                    }
                }
                FieldType::Enum { values } if values.is_empty() => {
                    return Err(format!("field '{}': enum has no allowed values", field.name));
                }
                FieldType::Date {
                    formats,
                    not_before,
                } => {
                    if formats.is_empty() {
                        return Err(format!("field '{}': no accepted date formats", field.name));
                    }
                    if let Some(bad) = formats.iter().find(|f| !is_valid_date_format(f)) {
                        return Err(format!(
                            "field '{}': invalid date format '{}'",
                            field.name, bad
                        ));
                    }
                    if let Some(other) = not_before {
                        match self.field(other).map(|f| &f.field_type) {
                            Some(FieldType::Date { .. }) if other != &field.name => {}
                            Some(FieldType::Date { .. }) => {
                                return Err(format!(
                                    "field '{}': not_before refers to itself",
                                    field.name
                                ));
                            }
                            Some(_) => {
                                return Err(format!(
                                    "field '{}': not_before field '{}' is not a date",
                                    field.name, other
                                ));
                            }
                            None => {
                                return Err(format!(
                                    "field '{}': not_before field '{}' is not declared",
                                    field.name, other
                                ));
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }
}

fn is_valid_date_format(format: &str) -> bool {
    !format.is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
