//! Outbreak registry
//!
//! Read-only mapping of outbreak name to its metadata: identifier, schema
//! location and the location of the latest linelist. Built once at startup
//! and passed to whatever needs it.

mod errors;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event};

pub use errors::{RegistryError, RegistryResult};

const OUTBREAK_SCHEMA_BASE: &str =
    "https://raw.githubusercontent.com/globaldothealth/outbreak-schema/main";

/// Metadata for one outbreak
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutbreakInfo {
    /// Outbreak identifier, e.g. `GHL2023.D11.1D60.1`
    pub id: String,
    /// Short human-readable description
    pub description: String,
    /// Schema location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Latest linelist location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Immutable lookup table of outbreaks by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutbreakRegistry {
    outbreaks: BTreeMap<String, OutbreakInfo>,
}

impl OutbreakRegistry {
    /// Builds a registry, rejecting unusable names.
    pub fn new(outbreaks: BTreeMap<String, OutbreakInfo>) -> RegistryResult<Self> {
        for name in outbreaks.keys() {
            validate_name(name)?;
        }
        Ok(Self { outbreaks })
    }

    /// Outbreaks known without any configuration
    pub fn builtin() -> Self {
        let mut outbreaks = BTreeMap::new();
        outbreaks.insert(
            "marburg".to_string(),
            OutbreakInfo {
                id: "GHL2023.D11.1D60.1".to_string(),
                description: "Marburg 2023 Equatorial Guinea".to_string(),
                schema: Some(format!("{}/outbreak.schema.json", OUTBREAK_SCHEMA_BASE)),
                url: None,
            },
        );
        outbreaks.insert(
            "mpox-2024".to_string(),
            OutbreakInfo {
                id: "GHL2024.D11.1E71".to_string(),
                description: "Mpox 2024".to_string(),
                schema: Some(format!(
                    "{}/GHL2024.D11.1E71.schema.json",
                    OUTBREAK_SCHEMA_BASE
                )),
                url: Some("https://mpox-2024.s3.eu-central-1.amazonaws.com/latest.csv".to_string()),
            },
        );
        Self { outbreaks }
    }

    /// Loads a registry from a JSON object of `name -> OutbreakInfo`.
    pub fn load(path: &Path) -> RegistryResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let outbreaks: BTreeMap<String, OutbreakInfo> =
            serde_json::from_str(&content).map_err(|e| RegistryError::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let registry = Self::new(outbreaks)?;
        let count = registry.len().to_string();
        log_event_with_fields(
            Event::RegistryLoaded,
            &[("outbreaks", &count), ("path", &path.display().to_string())],
        );
        Ok(registry)
    }

    /// Looks up an outbreak by name
    pub fn get(&self, name: &str) -> Option<&OutbreakInfo> {
        self.outbreaks.get(name)
    }

    /// Looks up an outbreak, failing with the list of known names
    pub fn require(&self, name: &str) -> RegistryResult<&OutbreakInfo> {
        self.get(name).ok_or_else(|| RegistryError::UnknownOutbreak {
            name: name.to_string(),
            known: self.names().map(str::to_string).collect(),
        })
    }

    /// Outbreak names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.outbreaks.keys().map(String::as_str)
    }

    /// `(name, info)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutbreakInfo)> {
        self.outbreaks.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.outbreaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outbreaks.is_empty()
    }
}

impl Default for OutbreakRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_name(name: &str) -> RegistryResult<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.chars().any(char::is_whitespace) {
        "name contains whitespace"
    } else {
        return Ok(());
    };
    Err(RegistryError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin() {
        let registry = OutbreakRegistry::builtin();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["marburg", "mpox-2024"]);

        let marburg = registry.get("marburg").unwrap();
        assert_eq!(marburg.id, "GHL2023.D11.1D60.1");
        assert!(marburg.url.is_none());
        assert!(marburg
            .schema
            .as_deref()
            .unwrap()
            .ends_with("/outbreak.schema.json"));

        let mpox = registry.get("mpox-2024").unwrap();
        assert_eq!(
            mpox.url.as_deref(),
            Some("https://mpox-2024.s3.eu-central-1.amazonaws.com/latest.csv")
        );
    }

    #[test]
    fn test_builtin_names_are_valid() {
        for name in OutbreakRegistry::builtin().names() {
            assert!(validate_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_require_lists_known() {
        let err = OutbreakRegistry::builtin().require("ebola").unwrap_err();
        assert_eq!(err.code(), "OLM_REGISTRY_UNKNOWN_OUTBREAK");
        assert_eq!(
            err.to_string(),
            "unknown outbreak 'ebola', known outbreaks: marburg, mpox-2024"
        );
    }

    #[test]
    fn test_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("outbreaks.json");
        fs::write(
            &path,
            r#"{"h5n1": {"id": "GHL2024.H5N1", "description": "H5N1", "schema": "h5n1.schema.json"}}"#,
        )
        .unwrap();

        let registry = OutbreakRegistry::load(&path).unwrap();
        assert_eq!(registry.len(), 1);
        let info = registry.get("h5n1").unwrap();
        assert_eq!(info.schema.as_deref(), Some("h5n1.schema.json"));
        assert!(info.url.is_none());
    }

    #[test]
    fn test_load_rejects_bad_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("outbreaks.json");
        fs::write(&path, r#"{"bird flu": {"id": "X", "description": "Y"}}"#).unwrap();

        let err = OutbreakRegistry::load(&path).unwrap_err();
        assert_eq!(err.code(), "OLM_REGISTRY_INVALID_NAME");
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        assert_eq!(
            OutbreakRegistry::load(&missing).unwrap_err().code(),
            "OLM_REGISTRY_IO"
        );

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "[1, 2]").unwrap();
        assert_eq!(
            OutbreakRegistry::load(&bad).unwrap_err().code(),
            "OLM_REGISTRY_MALFORMED"
        );
    }
}
