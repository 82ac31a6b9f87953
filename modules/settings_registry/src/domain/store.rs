//! Host settings-store abstraction
//!
//! The host platform owns all persisted setting state; this crate only talks
//! to it through this trait. Registration is async because the host exposes
//! promise-returning update calls; items are awaited one at a time, never
//! fanned out.

use crate::contract::SettingConfig;
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Persistent settings subsystem of the host
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Whether the subsystem is currently accepting registrations
    fn is_ready(&self) -> bool;

    /// Register one setting under `namespace.key`
    async fn register(&self, namespace: &str, key: &str, config: &SettingConfig) -> Result<()>;
}

/// In-memory store used for tests and host-less embedding
///
/// Keyed by `namespace.key`; later registrations overwrite earlier ones the
/// way the host's own store does.
#[derive(Clone, Default)]
pub struct InMemorySettingsStore {
    entries: Arc<RwLock<HashMap<String, SettingConfig>>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn make_key(namespace: &str, key: &str) -> String {
        format!("{}.{}", namespace, key)
    }

    /// Fetch a registered config by namespace and key
    pub fn get(&self, namespace: &str, key: &str) -> Option<SettingConfig> {
        self.entries
            .read()
            .get(&Self::make_key(namespace, key))
            .cloned()
    }

    /// Number of registered settings
    pub fn count(&self) -> usize {
        self.entries.read().len()
    }

    /// Registered keys for a namespace, unordered
    pub fn keys(&self, namespace: &str) -> Vec<String> {
        let prefix = format!("{}.", namespace);
        self.entries
            .read()
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    fn is_ready(&self) -> bool {
        true
    }

    async fn register(&self, namespace: &str, key: &str, config: &SettingConfig) -> Result<()> {
        self.entries
            .write()
            .insert(Self::make_key(namespace, key), config.clone());
        Ok(())
    }
}

/// Store standing in for a host whose settings subsystem has not come up
#[derive(Clone, Default)]
pub struct OfflineSettingsStore;

#[async_trait]
impl SettingsStore for OfflineSettingsStore {
    fn is_ready(&self) -> bool {
        false
    }

    async fn register(&self, _namespace: &str, _key: &str, _config: &SettingConfig) -> Result<()> {
        anyhow::bail!("settings subsystem is not ready")
    }
}
