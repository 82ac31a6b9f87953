//! Declarative setting definition store
//!
//! Holds the raw descriptor list read from configuration. Input is either an
//! ordered list of descriptor records or a map keyed by setting key; map
//! entries that lack an inner `key` inherit the map key, an explicit inner
//! `key` wins. Iteration preserves the input order in both shapes.

use crate::contract::RegistryError;
use serde_json::Value;

/// Ordered collection of raw setting descriptors
#[derive(Debug, Clone, Default)]
pub struct DefinitionStore {
    items: Vec<Value>,
}

impl DefinitionStore {
    /// Build from a raw collection value
    ///
    /// Anything other than an array or an object is rejected - that shape is
    /// a configuration bug, not a per-item failure.
    pub fn from_collection(collection: &Value) -> Result<Self, RegistryError> {
        let items = match collection {
            Value::Array(list) => list.clone(),
            Value::Object(map) => map
                .iter()
                .map(|(map_key, descriptor)| {
                    let mut descriptor = descriptor.clone();
                    if let Some(record) = descriptor.as_object_mut() {
                        record
                            .entry("key")
                            .or_insert_with(|| Value::String(map_key.clone()));
                    }
                    descriptor
                })
                .collect(),
            other => {
                return Err(RegistryError::InvalidCollection {
                    details: format!("expected a list or map of descriptors, got {}", json_type(other)),
                })
            }
        };
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Descriptors in input order
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    /// Keyed lookup by the descriptor's own `key` field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.items
            .iter()
            .find(|item| item.get("key").and_then(Value::as_str) == Some(key))
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}
