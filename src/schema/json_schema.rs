//! Import of JSON Schema documents
//!
//! Outbreak schemas are published as JSON Schema objects with one property
//! per linelist column. Only the flat subset that maps onto a field type is
//! accepted:
//!
//! | JSON Schema                                  | Field type                  |
//! |----------------------------------------------|-----------------------------|
//! | `integer` (+`minimum`/`maximum`/exclusive)   | integer                     |
//! | `number` (+`minimum`/`maximum`)              | float                       |
//! | `boolean`                                    | boolean                     |
//! | any type + `enum`                            | enum of the values as text  |
//! | `string` + `format: date`                    | date (`%Y-%m-%d`)           |
//! | `string` + `format: date-time`               | date (RFC 3339 date-times)  |
//! | `string` (+`pattern`)                        | string                      |
//!
//! Any other keyword, format or type fails the load. Annotation keywords
//! (`title`, `description`, ...) are accepted and ignored.

use std::collections::HashSet;
use std::fmt;

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::errors::{SchemaLoadError, SchemaResult};
use super::types::{FieldDef, FieldType, Pattern, Schema};

/// Keywords carrying no constraint
const ANNOTATIONS: &[&str] = &[
    "title",
    "description",
    "$comment",
    "examples",
    "default",
    "deprecated",
    "readOnly",
    "writeOnly",
];

/// Keywords mapped onto field types
const CONSTRAINTS: &[&str] = &[
    "type",
    "enum",
    "format",
    "pattern",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
];

/// Formats accepted for `format: date-time`, tried in order
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Returns true if `document` looks like a JSON Schema rather than a native schema
pub fn is_json_schema(document: &Value) -> bool {
    document.get("properties").is_some_and(Value::is_object)
}

/// Property names in document order, repeats included.
///
/// `serde_json::Map` keeps only the last of repeated keys, so repeats are
/// found on the raw document.
struct PropertyNames(Vec<String>);

impl<'de> Deserialize<'de> for PropertyNames {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NamesVisitor;

        impl<'de> Visitor<'de> for NamesVisitor {
            type Value = PropertyNames;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of property definitions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut names = Vec::new();
                while let Some(name) = map.next_key::<String>()? {
                    map.next_value::<IgnoredAny>()?;
                    names.push(name);
                }
                Ok(PropertyNames(names))
            }
        }

        deserializer.deserialize_map(NamesVisitor)
    }
}

#[derive(Deserialize)]
struct Outline {
    properties: PropertyNames,
}

/// Fails if the raw JSON Schema document declares a property twice.
pub(crate) fn reject_duplicate_properties(bytes: &[u8], origin: &str) -> SchemaResult<()> {
    let outline: Outline = serde_json::from_slice(bytes)
        .map_err(|e| SchemaLoadError::malformed(origin, e.to_string()))?;

    let mut seen = HashSet::new();
    match outline.properties.0.iter().find(|name| !seen.insert(name.as_str())) {
        Some(name) => Err(SchemaLoadError::Invalid {
            origin: origin.to_string(),
            reason: format!("duplicate field name '{}'", name),
        }),
        None => Ok(()),
    }
}

/// Converts a JSON Schema document into a [`Schema`], keeping property order.
pub fn from_json_schema(document: &Value, origin: &str) -> SchemaResult<Schema> {
    let properties = document
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| SchemaLoadError::malformed(origin, "'properties' must be an object"))?;

    let required = required_names(document, origin)?;

    let mut fields = Vec::with_capacity(properties.len());
    for (name, property) in properties {
        let property = property.as_object().ok_or_else(|| {
            SchemaLoadError::unsupported(origin, name, "property definition is not an object")
        })?;
        let mut field = FieldDef::new(name.clone(), field_type(property, name, origin)?);
        field.required = required.contains(name.as_str());
        fields.push(field);
    }

    let schema_id = ["$id", "title"]
        .iter()
        .find_map(|key| document.get(*key).and_then(Value::as_str))
        .unwrap_or_default();

    let mut schema = Schema::new(schema_id, fields);
    schema.description = document
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(schema)
}

fn required_names<'a>(document: &'a Value, origin: &str) -> SchemaResult<HashSet<&'a str>> {
    match document.get("required") {
        None => Ok(HashSet::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().ok_or_else(|| {
                    SchemaLoadError::malformed(origin, "'required' entries must be strings")
                })
            })
            .collect(),
        Some(_) => Err(SchemaLoadError::malformed(origin, "'required' must be an array")),
    }
}

/// Picks the declared type, skipping `null` in union types.
fn declared_type<'a>(
    property: &'a Map<String, Value>,
    name: &str,
    origin: &str,
) -> SchemaResult<Option<&'a str>> {
    match property.get("type") {
        None => Ok(None),
        Some(Value::String(t)) => Ok(Some(t.as_str())),
        Some(Value::Array(types)) => Ok(types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null")),
        Some(other) => Err(SchemaLoadError::unsupported(
            origin,
            name,
            format!("'type' must be a string or array, found {}", other),
        )),
    }
}

fn check_keywords(property: &Map<String, Value>, name: &str, origin: &str) -> SchemaResult<()> {
    match property
        .keys()
        .find(|k| !ANNOTATIONS.contains(&k.as_str()) && !CONSTRAINTS.contains(&k.as_str()))
    {
        Some(keyword) => Err(SchemaLoadError::unsupported(
            origin,
            name,
            format!("keyword '{}' is not supported", keyword),
        )),
        None => Ok(()),
    }
}

fn field_type(property: &Map<String, Value>, name: &str, origin: &str) -> SchemaResult<FieldType> {
    check_keywords(property, name, origin)?;
    let declared = declared_type(property, name, origin)?;

    if let Some(values) = property.get("enum") {
        return enum_type(values, name, origin);
    }

    match declared {
        None | Some("string") => string_type(property, name, origin),
        Some("integer") => Ok(FieldType::Integer {
            min: integer_bound(property, Bound::Lower, name, origin)?,
            max: integer_bound(property, Bound::Upper, name, origin)?,
        }),
        Some("number") => {
            for keyword in ["exclusiveMinimum", "exclusiveMaximum"] {
                if !matches!(property.get(keyword), None | Some(Value::Bool(false))) {
                    return Err(SchemaLoadError::unsupported(
                        origin,
                        name,
                        format!("'{}' is not supported on numbers", keyword),
                    ));
                }
            }
            Ok(FieldType::Float {
                min: number(property, "minimum", name, origin)?,
                max: number(property, "maximum", name, origin)?,
            })
        }
        Some("boolean") => Ok(FieldType::Boolean),
        Some(other) => Err(SchemaLoadError::unsupported(
            origin,
            name,
            format!("type '{}' has no linelist equivalent", other),
        )),
    }
}

fn string_type(property: &Map<String, Value>, name: &str, origin: &str) -> SchemaResult<FieldType> {
    match property.get("format") {
        None => {}
        Some(Value::String(format)) if format == "date" => return Ok(FieldType::date()),
        Some(Value::String(format)) if format == "date-time" => {
            return Ok(FieldType::Date {
                formats: DATE_TIME_FORMATS.iter().map(|f| f.to_string()).collect(),
                not_before: None,
            })
        }
        Some(other) => {
            return Err(SchemaLoadError::unsupported(
                origin,
                name,
                format!("format {} is not supported", other),
            ))
        }
    }

    let pattern = match property.get("pattern") {
        None => None,
        Some(Value::String(p)) => Some(Pattern::new(p).map_err(|e| {
            SchemaLoadError::unsupported(origin, name, format!("invalid pattern: {}", e))
        })?),
        Some(_) => {
            return Err(SchemaLoadError::unsupported(
                origin,
                name,
                "'pattern' must be a string",
            ))
        }
    };
    Ok(FieldType::String { pattern })
}

fn number(
    property: &Map<String, Value>,
    keyword: &str,
    name: &str,
    origin: &str,
) -> SchemaResult<Option<f64>> {
    match property.get(keyword) {
        None => Ok(None),
        Some(v) => v.as_f64().map(Some).ok_or_else(|| {
            SchemaLoadError::unsupported(origin, name, format!("'{}' must be a number", keyword))
        }),
    }
}

#[derive(Clone, Copy)]
enum Bound {
    Lower,
    Upper,
}

/// Tightest inclusive integer bound from the inclusive and exclusive keywords.
///
/// Handles both the numeric `exclusiveMinimum` form and the older boolean
/// form that turns `minimum` exclusive.
fn integer_bound(
    property: &Map<String, Value>,
    bound: Bound,
    name: &str,
    origin: &str,
) -> SchemaResult<Option<i64>> {
    let (inclusive_key, exclusive_key) = match bound {
        Bound::Lower => ("minimum", "exclusiveMinimum"),
        Bound::Upper => ("maximum", "exclusiveMaximum"),
    };
    let inclusive = number(property, inclusive_key, name, origin)?;

    let (inclusive, exclusive) = match property.get(exclusive_key) {
        None | Some(Value::Bool(false)) => (inclusive, None),
        Some(Value::Bool(true)) => match inclusive {
            Some(v) => (None, Some(v)),
            None => {
                return Err(SchemaLoadError::unsupported(
                    origin,
                    name,
                    format!("'{}: true' needs '{}'", exclusive_key, inclusive_key),
                ))
            }
        },
        Some(_) => (inclusive, number(property, exclusive_key, name, origin)?),
    };

    let candidates = [
        inclusive.map(|v| match bound {
            Bound::Lower => v.ceil(),
            Bound::Upper => v.floor(),
        }),
        exclusive.map(|v| match bound {
            Bound::Lower => v.floor() + 1.0,
            Bound::Upper => v.ceil() - 1.0,
        }),
    ];
    let tightest = candidates.into_iter().flatten().reduce(|a, b| match bound {
        Bound::Lower => a.max(b),
        Bound::Upper => a.min(b),
    });

    Ok(tightest.map(|v| v as i64))
}

/// Enum members as cell text; `null` members are dropped.
fn enum_type(values: &Value, name: &str, origin: &str) -> SchemaResult<FieldType> {
    let items = values
        .as_array()
        .ok_or_else(|| SchemaLoadError::unsupported(origin, name, "'enum' must be an array"))?;

    let values = items
        .iter()
        .filter(|v| !v.is_null())
        .map(|v| match v {
            Value::String(s) => Ok(s.clone()),
            Value::Number(_) | Value::Bool(_) => Ok(v.to_string()),
            other => Err(SchemaLoadError::unsupported(
                origin,
                name,
                format!("enum member {} has no cell form", other),
            )),
        })
        .collect::<SchemaResult<Vec<_>>>()?;

    Ok(FieldType::Enum { values })
}
