//! Descriptor parsing and normalization
//!
//! One parse pass takes the raw descriptor collection and produces normalized
//! descriptors plus an aggregate report. Items hidden by a visibility
//! predicate are counted as planned exclusions, distinct from validation
//! failures, so operators can tell "intentionally off" apart from "broken".

use crate::contract::{
    ChangeHook, NumericRange, ParsedSettings, RegistrationReport, RegistryError, SettingConfig,
    SettingDescriptor, SettingKind, SettingScope,
};
use crate::domain::definitions::DefinitionStore;
use crate::domain::hooks::HookDispatcher;
use crate::domain::kind::{canonicalize_kind, FieldRegistry};
use crate::domain::validate::{check, AllowedProps};
use crate::domain::visibility::{should_show, ContextMapping, ContextSet};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

/// Normalizes raw descriptor collections into contract models
pub struct Parser {
    required_keys: Vec<String>,
    allowed: AllowedProps,
    registry: FieldRegistry,
    contexts: ContextSet,
    mapping: ContextMapping,
    dispatcher: Arc<HookDispatcher>,
}

impl Parser {
    pub fn new(
        required_keys: Vec<String>,
        allowed: AllowedProps,
        registry: FieldRegistry,
        contexts: ContextSet,
        mapping: ContextMapping,
        dispatcher: Arc<HookDispatcher>,
    ) -> Self {
        Self {
            required_keys,
            allowed,
            registry,
            contexts,
            mapping,
            dispatcher,
        }
    }

    /// Parse a raw collection (list or keyed map) of descriptors
    ///
    /// Per-item failures land in the report; only boundary conditions are
    /// errors: a non-collection input, a collection with nothing to process,
    /// or a collection where every item failed.
    pub fn parse(&self, collection: &Value) -> Result<ParsedSettings, RegistryError> {
        let store = DefinitionStore::from_collection(collection)?;
        if store.is_empty() {
            return Err(RegistryError::NoValidSettings);
        }

        let mut report = RegistrationReport::new();
        let mut settings = Vec::new();

        for (index, raw) in store.iter().enumerate() {
            report.processed += 1;
            let key = raw
                .get("key")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{}", index));

            if !check(raw, &self.required_keys, &self.allowed) {
                report.unplanned_failed.push(key);
                continue;
            }

            if !should_show(
                raw.get("showOnlyIfFlag"),
                raw.get("dontShowIfFlag"),
                &self.contexts,
                &self.mapping,
            ) {
                tracing::debug!(key = %key, "setting hidden by visibility predicate");
                report.planned_excluded.push(key);
                continue;
            }

            settings.push(self.normalize(&key, raw));
            report.successful += 1;
            report.succeeded.push(key);
        }

        report.completed_at = Utc::now();

        if report.successful == 0 {
            return Err(RegistryError::AllSettingsInvalid {
                failed: report.failed(),
            });
        }
        if report.successful < report.processed {
            if report.unplanned_failed.is_empty() {
                tracing::debug!(
                    succeeded = ?report.succeeded,
                    excluded = ?report.planned_excluded,
                    "parse pass finished with planned exclusions only"
                );
            } else {
                tracing::warn!(
                    succeeded = ?report.succeeded,
                    excluded = ?report.planned_excluded,
                    failed = ?report.unplanned_failed,
                    "parse pass finished with failures"
                );
            }
        }

        Ok(ParsedSettings { settings, report })
    }

    fn normalize(&self, key: &str, raw: &Value) -> SettingDescriptor {
        // validation guarantees `config` is an object
        let config = raw
            .get("config")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let scope_tag = config.get("scope").and_then(Value::as_str).unwrap_or("");
        let scope = SettingScope::from_tag(scope_tag).unwrap_or_else(|| {
            tracing::debug!(key, scope = scope_tag, "unknown scope tag, using client scope");
            SettingScope::Client
        });

        let kind = match config.get("type") {
            Some(Value::String(tag)) => canonicalize_kind(tag, &self.registry),
            Some(other) => SettingKind::Raw(other.to_string()),
            None => SettingKind::Raw(String::new()),
        };

        SettingDescriptor {
            key: key.to_string(),
            config: SettingConfig {
                name: config
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                hint: config
                    .get("hint")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                scope,
                menu: config.get("config").and_then(Value::as_bool).unwrap_or(true),
                kind,
                default: config.get("default").cloned().unwrap_or(Value::Null),
                choices: config.get("choices").and_then(Value::as_object).cloned(),
                range: config.get("range").and_then(parse_range),
                on_change: self.wire_change_hook(key, config.get("onChange")),
            },
            show_only_if: raw.get("showOnlyIfFlag").cloned(),
            dont_show_if: raw.get("dontShowIfFlag").cloned(),
        }
    }

    /// Replace a raw `onChange` descriptor with a broadcast callback
    ///
    /// The callback fires the configured hook name (the descriptor key when
    /// no name is given) through the dispatcher; broadcast failures are
    /// logged there and never reach the host. Without `sendHook` the raw
    /// object is dropped entirely.
    fn wire_change_hook(&self, key: &str, on_change: Option<&Value>) -> Option<ChangeHook> {
        let opts = on_change.and_then(Value::as_object)?;
        let send_hook = opts.get("sendHook").and_then(Value::as_bool).unwrap_or(false);
        if !send_hook {
            return None;
        }

        let hook_name = match opts.get("hookName").and_then(Value::as_str) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ if !key.is_empty() => key.to_string(),
            _ => {
                tracing::warn!("onChange hook requested but no usable hook name available");
                return None;
            }
        };

        let dispatcher = Arc::clone(&self.dispatcher);
        let broadcast_name = hook_name.clone();
        let callback = Arc::new(move |value: &Value| {
            dispatcher.trigger(&broadcast_name, value);
        });
        Some(ChangeHook::new(hook_name, callback))
    }
}

fn parse_range(value: &Value) -> Option<NumericRange> {
    let record = value.as_object()?;
    Some(NumericRange {
        min: record.get("min")?.as_f64()?,
        max: record.get("max")?.as_f64()?,
        step: record.get("step").and_then(Value::as_f64),
    })
}
