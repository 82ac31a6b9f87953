//! Structural validation of raw setting descriptors
//!
//! Descriptors arrive as duck-typed JSON records; before normalization each
//! one is checked against an externally supplied list of required dotted
//! paths and an allow-list of `config` properties with expected type tags.
//! Validation never fails the whole pass - it logs one diagnostic per
//! violated rule and answers with a plain boolean.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Expected runtime type of an allowed `config` property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropType {
    String,
    Boolean,
    Number,
    Object,
    Array,
    Any,
}

impl PropType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Number => value.is_number(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::Any => true,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Object => "object",
            Self::Array => "array",
            Self::Any => "any",
        }
    }
}

/// Allow-list of `config` properties with their expected types
pub type AllowedProps = HashMap<String, PropType>;

/// Allow-list matching the host's documented setting-schema fields
pub fn default_allowed_props() -> AllowedProps {
    let mut allowed = AllowedProps::new();
    allowed.insert("name".to_string(), PropType::String);
    allowed.insert("hint".to_string(), PropType::String);
    allowed.insert("scope".to_string(), PropType::String);
    allowed.insert("config".to_string(), PropType::Boolean);
    allowed.insert("type".to_string(), PropType::Any);
    allowed.insert("default".to_string(), PropType::Any);
    allowed.insert("choices".to_string(), PropType::Object);
    allowed.insert("range".to_string(), PropType::Object);
    allowed.insert("onChange".to_string(), PropType::Object);
    allowed
}

/// A field is filled when it exists, is not null, and is not an empty string.
/// `false` and `0` count as filled - they are legitimate defaults.
fn is_filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn walk<'a>(root: &'a Value, dotted: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in dotted.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

/// Check one raw descriptor against the required keys and the allow-list
///
/// Returns false on the first structural defect (not a record, missing/empty
/// `key`, missing `config`); otherwise evaluates every remaining rule so the
/// log names each violation, and returns whether all of them held.
pub fn check(descriptor: &Value, required_keys: &[String], allowed: &AllowedProps) -> bool {
    let record = match descriptor.as_object() {
        Some(record) => record,
        None => {
            tracing::warn!("setting descriptor is not a keyed record: {}", descriptor);
            return false;
        }
    };

    let key = record.get("key").and_then(Value::as_str).unwrap_or("");
    if key.is_empty() {
        tracing::warn!("setting descriptor is missing a non-empty 'key'");
        return false;
    }
    let config = match record.get("config").and_then(Value::as_object) {
        Some(config) => config,
        None => {
            tracing::warn!(key, "setting descriptor is missing its 'config' record");
            return false;
        }
    };

    let mut ok = true;

    for required in required_keys {
        if !is_filled(walk(descriptor, required)) {
            tracing::warn!(key, field = %required, "required setting field is missing or empty");
            ok = false;
        }
    }

    for (prop, value) in config {
        match allowed.get(prop) {
            None => {
                tracing::warn!(key, prop = %prop, "setting config property is not allowed");
                ok = false;
            }
            Some(expected) if !expected.matches(value) => {
                tracing::warn!(
                    key,
                    prop = %prop,
                    expected = expected.as_str(),
                    "setting config property has the wrong type"
                );
                ok = false;
            }
            Some(_) => {}
        }
    }

    ok
}
