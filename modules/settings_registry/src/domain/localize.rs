//! Localization of descriptor text fields
//!
//! Rewrites the human-readable fields of a descriptor (`name`, `hint`, and
//! the labels inside `choices`) through a translation lookup. Descriptors
//! are shallow-copied, never mutated in place, and a failing translation
//! keeps the original string.

use crate::contract::SettingDescriptor;
use anyhow::Result;
use std::collections::HashMap;

/// Translation lookup, normally backed by the host's localization service
pub trait Translator: Send + Sync {
    /// Translate one localization key
    fn localize(&self, key: &str) -> Result<String>;
}

/// Dictionary-backed translator
///
/// Mirrors the host behavior of resolving keys from loaded language files;
/// a key with no entry is an error so callers keep the original string.
#[derive(Debug, Clone, Default)]
pub struct StaticTranslator {
    entries: HashMap<String, String>,
}

impl StaticTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, translation: impl Into<String>) {
        self.entries.insert(key.into(), translation.into());
    }
}

impl Translator for StaticTranslator {
    fn localize(&self, key: &str) -> Result<String> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no translation for '{}'", key))
    }
}

fn translate_or_keep(translator: &dyn Translator, text: &str) -> String {
    match translator.localize(text) {
        Ok(translated) => translated,
        Err(e) => {
            tracing::debug!("keeping untranslated text '{}': {}", text, e);
            text.to_string()
        }
    }
}

/// Localize one descriptor's text fields
///
/// The custom handle wins over the default translator; with neither, the
/// descriptor is returned unchanged. Repeated application is NOT guarded:
/// localizing an already-localized descriptor runs the translator again.
pub fn localize_setting(
    descriptor: &SettingDescriptor,
    custom: Option<&dyn Translator>,
    default: Option<&dyn Translator>,
) -> SettingDescriptor {
    let translator = match custom.or(default) {
        Some(translator) => translator,
        None => return descriptor.clone(),
    };

    let mut localized = descriptor.clone();
    localized.config.name = translate_or_keep(translator, &descriptor.config.name);
    localized.config.hint = translate_or_keep(translator, &descriptor.config.hint);
    if let Some(choices) = localized.config.choices.as_mut() {
        for label in choices.values_mut() {
            if let serde_json::Value::String(text) = label {
                *text = translate_or_keep(translator, text);
            }
        }
    }
    localized
}

/// Localize a list of descriptors, preserving order
pub fn localize_settings(
    descriptors: &[SettingDescriptor],
    custom: Option<&dyn Translator>,
    default: Option<&dyn Translator>,
) -> Vec<SettingDescriptor> {
    descriptors
        .iter()
        .map(|descriptor| localize_setting(descriptor, custom, default))
        .collect()
}
