//! Configuration for the settings registry module
//!
//! The constants tree a module ships: its manifest, the required-key list,
//! the config-property allow-list, the raw descriptor collection, and the
//! visibility context mapping.

use crate::domain::validate::{default_allowed_props, AllowedProps};
use crate::domain::visibility::ContextMapping;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Module manifest; `id` doubles as the settings namespace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Module identifier, used as the settings namespace
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub version: String,

    /// Any further manifest fields, kept for visibility predicates
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Settings registry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Module manifest
    pub manifest: Manifest,

    /// Dotted paths every descriptor must fill
    #[serde(default = "default_required_keys")]
    pub required_keys: Vec<String>,

    /// Allowed `config` properties with expected types
    #[serde(default = "default_allowed_props")]
    pub allowed_props: AllowedProps,

    /// Raw descriptor collection (list or keyed map)
    #[serde(default = "default_settings")]
    pub settings: serde_json::Value,

    /// Visibility prefix table
    #[serde(default)]
    pub context_mapping: ContextMapping,

    /// Module constants exposed to visibility predicates
    #[serde(default)]
    pub constants: serde_json::Value,

    /// Extra field-registry entries on top of the host's standard fields
    #[serde(default)]
    pub field_types: HashMap<String, String>,
}

impl Config {
    /// Load from a YAML document
    pub fn from_yaml_str(source: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Load from an already-parsed JSON value
    pub fn from_json_value(value: serde_json::Value) -> anyhow::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// The namespace settings register under
    pub fn namespace(&self) -> &str {
        &self.manifest.id
    }
}

fn default_required_keys() -> Vec<String> {
    [
        "key",
        "config",
        "config.name",
        "config.hint",
        "config.scope",
        "config.type",
        "config.default",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_settings() -> serde_json::Value {
    serde_json::Value::Array(Vec::new())
}
