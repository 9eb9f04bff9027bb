//! Config module - File-based engine configuration.
//!
//! A [`DiffConfig`] is read from YAML or JSON and turned into an
//! [`ObjectDiffBuilder`] for comparing [`Value`] documents:
//!
//! ```yaml
//! identities:
//!   memberSrl: AAA
//! ignore_paths:
//!   - /metadata/.*
//! key_field: id
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::diff::{ObjectDiff, ObjectDiffBuilder};
use crate::introspect::Diffable;
use crate::value::Value;

/// ConfigError represents a failure to load a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML configuration")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON configuration")]
    Json(#[from] serde_json::Error),
}

/// DiffConfig holds the engine settings that can be expressed without code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffConfig {
    /// Labels copied into every result.
    pub identities: BTreeMap<String, String>,
    /// Regular expressions; matching paths are not compared.
    pub ignore_paths: Vec<String>,
    /// Field used to align lists of objects instead of comparing them by position.
    pub key_field: Option<String>,
}

impl DiffConfig {
    /// Parses a YAML configuration. JSON is accepted too.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Creates a builder preconfigured with these settings.
    ///
    /// With a `key_field`, lists whose first element is an object are aligned by
    /// that field; an element without it makes the list fall back to positions.
    pub fn to_builder(&self) -> ObjectDiffBuilder {
        let mut builder = ObjectDiff::builder()
            .identities(self.identities.iter())
            .ignore_paths(self.ignore_paths.iter().cloned());
        if let Some(field) = self.key_field.clone() {
            builder = builder.fallible_alignment_key::<Value, _, _, _>(move |element: &Value| {
                element
                    .as_map()
                    .and_then(|map| map.get(&field))
                    .filter(|key| !key.is_null())
                    .map(Diffable::describe)
                    .ok_or_else(|| format!("element has no `{}` field", field))
            });
        }
        builder
    }
}
