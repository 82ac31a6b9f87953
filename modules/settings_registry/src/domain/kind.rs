//! Type-tag canonicalization against the host field registry

use crate::contract::SettingKind;
use std::collections::HashMap;

/// Alias prefixes accepted in front of registry references
const ALIAS_PREFIXES: [&str; 2] = ["datafield:", "datamodel:"];

/// Lookup table mapping type strings to host data-field/model tags
///
/// Resolved once at load time; references may be bare class names
/// ("StringField"), dotted paths ("fields.StringField"), or carry an alias
/// prefix ("datafield:StringField").
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    entries: HashMap<String, String>,
}

impl FieldRegistry {
    /// Empty registry; every non-primitive tag stays `Raw`
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry preloaded with the host's standard data fields
    pub fn with_standard_fields() -> Self {
        let mut registry = Self::empty();
        for field in [
            "StringField",
            "NumberField",
            "BooleanField",
            "ObjectField",
            "ArrayField",
            "ColorField",
            "FilePathField",
        ] {
            registry.insert(field, field);
        }
        registry
    }

    /// Register a lookup name for a canonical field tag
    pub fn insert(&mut self, name: impl Into<String>, canonical: impl Into<String>) {
        self.entries.insert(name.into(), canonical.into());
    }

    /// Resolve a reference to its canonical field tag
    ///
    /// Alias prefixes are stripped first; a dotted path falls back to its
    /// final segment so "fields.StringField" finds "StringField".
    pub fn resolve(&self, reference: &str) -> Option<&str> {
        let stripped = ALIAS_PREFIXES
            .iter()
            .find_map(|prefix| reference.strip_prefix(prefix))
            .unwrap_or(reference);

        if let Some(canonical) = self.entries.get(stripped) {
            return Some(canonical.as_str());
        }
        let last_segment = stripped.rsplit('.').next().unwrap_or(stripped);
        self.entries.get(last_segment).map(String::as_str)
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::with_standard_fields()
    }
}

/// Map a raw `type` string to its canonical tag
///
/// Primitive names match case-insensitively; anything else goes through the
/// registry. Unresolved strings are preserved as `Raw` rather than rejected.
pub fn canonicalize_kind(raw: &str, registry: &FieldRegistry) -> SettingKind {
    match raw.to_ascii_lowercase().as_str() {
        "boolean" => SettingKind::Bool,
        "integer" | "float" | "number" => SettingKind::Number,
        "string" => SettingKind::Text,
        "object" => SettingKind::Object,
        "array" => SettingKind::Array,
        _ => match registry.resolve(raw) {
            Some(canonical) => SettingKind::Field(canonical.to_string()),
            None => SettingKind::Raw(raw.to_string()),
        },
    }
}
