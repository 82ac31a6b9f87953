//! Registration of normalized descriptors into the host settings store
//!
//! Per-item problems (hidden by a predicate, store not ready, store
//! rejection) become failure outcomes, never exceptions; a single bad item
//! never aborts a batch. Items are registered sequentially in input order.

use crate::contract::{RegisterOutcome, RegistrationReport, RegistryError, SettingDescriptor};
use crate::domain::hooks::{HookDispatcher, SETTINGS_READY, SETTING_REGISTERED};
use crate::domain::store::SettingsStore;
use crate::domain::visibility::{should_show, ContextMapping, ContextSet};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

enum ItemResult {
    Registered,
    Hidden(String),
    Failed(String),
}

/// Pushes descriptors into the host store under one namespace
pub struct Registrar {
    namespace: String,
    store: Arc<dyn SettingsStore>,
    dispatcher: Arc<HookDispatcher>,
    contexts: ContextSet,
    mapping: ContextMapping,
}

impl Registrar {
    /// A registrar without a namespace cannot exist - the namespace comes in
    /// explicitly or is derived from the module manifest by the caller.
    pub fn new(
        namespace: impl Into<String>,
        store: Arc<dyn SettingsStore>,
        dispatcher: Arc<HookDispatcher>,
        contexts: ContextSet,
        mapping: ContextMapping,
    ) -> Result<Self, RegistryError> {
        let namespace = namespace.into();
        if namespace.is_empty() {
            return Err(RegistryError::MissingNamespace);
        }
        Ok(Self {
            namespace,
            store,
            dispatcher,
            contexts,
            mapping,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn register_item(&self, descriptor: &SettingDescriptor) -> ItemResult {
        if descriptor.key.is_empty() {
            return ItemResult::Failed("descriptor has no key".to_string());
        }
        if !self.store.is_ready() {
            return ItemResult::Failed(format!(
                "settings subsystem not ready, '{}' was not registered",
                descriptor.key
            ));
        }
        // visibility is re-checked here so registration alone also honors
        // predicates when a caller skips the parse pass
        if !should_show(
            descriptor.show_only_if.as_ref(),
            descriptor.dont_show_if.as_ref(),
            &self.contexts,
            &self.mapping,
        ) {
            return ItemResult::Hidden(format!(
                "'{}' is hidden by its visibility predicate",
                descriptor.key
            ));
        }

        match self
            .store
            .register(&self.namespace, &descriptor.key, &descriptor.config)
            .await
        {
            Ok(()) => {
                self.dispatcher.trigger(
                    SETTING_REGISTERED,
                    &json!({
                        "namespace": self.namespace,
                        "key": descriptor.key,
                        "timestamp": Utc::now().to_rfc3339(),
                    }),
                );
                ItemResult::Registered
            }
            Err(e) => ItemResult::Failed(format!(
                "registering '{}' failed: {}",
                descriptor.key, e
            )),
        }
    }

    /// Register one descriptor; never returns an error
    pub async fn register_setting(&self, descriptor: &SettingDescriptor) -> RegisterOutcome {
        match self.register_item(descriptor).await {
            ItemResult::Registered => {
                RegisterOutcome::ok(format!("registered '{}'", descriptor.key))
            }
            ItemResult::Hidden(message) | ItemResult::Failed(message) => {
                tracing::debug!(namespace = %self.namespace, "{}", message);
                RegisterOutcome::fail(message)
            }
        }
    }

    /// Register a batch sequentially, in input order
    ///
    /// An empty batch yields a zeroed report rather than an error, unlike the
    /// parse pass. Partial success still counts as success overall.
    pub async fn register_all(&self, descriptors: &[SettingDescriptor]) -> RegistrationReport {
        let mut report = RegistrationReport::new();

        for descriptor in descriptors {
            report.processed += 1;
            match self.register_item(descriptor).await {
                ItemResult::Registered => {
                    report.successful += 1;
                    report.succeeded.push(descriptor.key.clone());
                }
                ItemResult::Hidden(message) => {
                    report.planned_excluded.push(descriptor.key.clone());
                    report.messages.push(message);
                }
                ItemResult::Failed(message) => {
                    tracing::warn!(namespace = %self.namespace, "{}", message);
                    report.unplanned_failed.push(descriptor.key.clone());
                    report.messages.push(message);
                }
            }
        }

        report.completed_at = Utc::now();

        if report.is_success() {
            self.dispatcher.trigger(
                SETTINGS_READY,
                &json!({
                    "namespace": self.namespace,
                    "processed": report.processed,
                    "successful": report.successful,
                    "timestamp": report.completed_at.to_rfc3339(),
                }),
            );
        }
        report
    }
}
