//! Schema loader
//!
//! - Reads a schema from a local path or a URL
//! - Accepts native schema documents and the JSON Schema subset
//! - Malformed or inconsistent schemas fail the load; there is no fallback

use serde_json::Value;

use super::errors::{SchemaLoadError, SchemaResult};
use super::json_schema;
use super::types::Schema;
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::source::{Fetch, Source};

/// Loads schemas through a [`Fetch`] capability.
pub struct SchemaLoader<'a> {
    fetcher: &'a dyn Fetch,
}

impl<'a> SchemaLoader<'a> {
    /// Creates a loader that uses `fetcher` for remote sources.
    pub fn new(fetcher: &'a dyn Fetch) -> Self {
        Self { fetcher }
    }

    /// Reads and parses the schema at `source`.
    ///
    /// # Errors
    ///
    /// - `Unreachable` if the bytes cannot be obtained
    /// - `Malformed` if the document is not a schema
    /// - `Invalid` if the schema is inconsistent (e.g. duplicate field names)
    pub fn load(&self, source: &Source) -> SchemaResult<Schema> {
        let origin = source.to_string();
        let scope = ObservationScope::with_fields("SCHEMA_LOAD", &[("source", &origin)]);

        let result = source
            .read(self.fetcher)
            .map_err(|e| SchemaLoadError::Unreachable {
                origin: origin.clone(),
                source: e,
            })
            .and_then(|bytes| Self::parse(&bytes, &origin));

        match &result {
            Ok(schema) => scope.complete_with_fields(&[("fields", &schema.fields.len().to_string())]),
            Err(e) => scope.fail(&e.to_string()),
        }
        result
    }

    /// Parses a schema document already in memory.
    ///
    /// `origin` names the document in error messages.
    pub fn parse(bytes: &[u8], origin: &str) -> SchemaResult<Schema> {
        let document: Value = serde_json::from_slice(bytes)
            .map_err(|e| SchemaLoadError::malformed(origin, format!("invalid JSON: {}", e)))?;

        let schema = if json_schema::is_json_schema(&document) {
            json_schema::reject_duplicate_properties(bytes, origin)?;
            json_schema::from_json_schema(&document, origin)?
        } else {
            serde_json::from_value::<Schema>(document)
                .map_err(|e| SchemaLoadError::malformed(origin, e.to_string()))?
        };

        schema
            .validate_structure()
            .map_err(|reason| SchemaLoadError::Invalid {
                origin: origin.to_string(),
                reason,
            })?;

        let field_count = schema.fields.len().to_string();
        log_event_with_fields(
            Event::SchemaLoaded,
            &[
                ("fields", &field_count),
                ("origin", origin),
                ("schema_id", &schema.schema_id),
            ],
        );

        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDef, FieldType};
    use crate::source::{FetchError, FetchResult};
    use tempfile::TempDir;

    struct NoNetwork;

    impl Fetch for NoNetwork {
        fn fetch(&self, url: &str) -> FetchResult<Vec<u8>> {
            Err(FetchError::Network {
                url: url.to_string(),
                reason: "offline".into(),
            })
        }
    }

    const NATIVE: &str = r#"{
        "schema_id": "GHL2023.D11.1D60.1",
        "missing_values": ["NA"],
        "fields": [
            {"name": "ID", "type": "string", "required": true},
            {"name": "Age", "type": "integer", "min": 0, "max": 120},
            {"name": "Outcome", "type": "enum", "values": ["recovered", "death"]},
            {"name": "Date_onset", "type": "date"},
            {"name": "Date_death", "type": "date", "formats": ["%Y-%m-%d", "%d/%m/%Y"], "not_before": "Date_onset"},
            {"name": "Hospitalised", "type": "boolean"}
        ]
    }"#;

    #[test]
    fn test_parse_native_schema() {
        let schema = SchemaLoader::parse(NATIVE.as_bytes(), "native.json").unwrap();
        assert_eq!(schema.schema_id, "GHL2023.D11.1D60.1");
        assert_eq!(schema.fields.len(), 6);
        assert_eq!(schema.fields[0], FieldDef::string("ID").required());
        assert_eq!(schema.missing_values, vec!["NA".to_string()]);
        assert_eq!(
            schema.field("Date_death").unwrap().field_type,
            FieldType::Date {
                formats: vec!["%Y-%m-%d".into(), "%d/%m/%Y".into()],
                not_before: Some("Date_onset".into()),
            }
        );
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = SchemaLoader::parse(b"{not json", "broken.json").unwrap_err();
        assert_eq!(err.code(), "OLM_SCHEMA_MALFORMED");
    }

    #[test]
    fn test_parse_unknown_type() {
        let doc = br#"{"fields": [{"name": "X", "type": "uuid"}]}"#;
        let err = SchemaLoader::parse(doc, "s.json").unwrap_err();
        assert_eq!(err.code(), "OLM_SCHEMA_MALFORMED");
    }

    #[test]
    fn test_parse_duplicate_field() {
        let doc = br#"{"fields": [
            {"name": "ID", "type": "string"},
            {"name": "ID", "type": "integer"}
        ]}"#;
        let err = SchemaLoader::parse(doc, "s.json").unwrap_err();
        assert_eq!(err.code(), "OLM_SCHEMA_INVALID");
        assert!(err.to_string().contains("duplicate field name 'ID'"));
    }

    #[test]
    fn test_parse_json_schema_duplicate_property() {
        let doc = br#"{"properties": {"Age": {"type": "integer"}, "ID": {"type": "string"}, "Age": {"type": "string"}}}"#;
        let err = SchemaLoader::parse(doc, "s.json").unwrap_err();
        assert_eq!(err.code(), "OLM_SCHEMA_INVALID");
        assert!(err.to_string().contains("duplicate field name 'Age'"));
    }

    #[test]
    fn test_parse_json_schema() {
        let doc = br#"{"properties": {"ID": {"type": "string"}}, "required": ["ID"]}"#;
        let schema = SchemaLoader::parse(doc, "s.json").unwrap();
        assert_eq!(schema.fields, vec![FieldDef::string("ID").required()]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, NATIVE).unwrap();

        let fetcher = NoNetwork;
        let schema = SchemaLoader::new(&fetcher)
            .load(&Source::Path(path))
            .unwrap();
        assert_eq!(schema.fields.len(), 6);
    }

    #[test]
    fn test_load_unreachable_url() {
        let fetcher = NoNetwork;
        let err = SchemaLoader::new(&fetcher)
            .load(&Source::parse("https://example.org/schema.json"))
            .unwrap_err();
        assert_eq!(err.code(), "OLM_SCHEMA_UNREACHABLE");
        assert!(err.to_string().starts_with("cannot load schema"));
    }
}
