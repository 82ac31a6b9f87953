//! In-process hook dispatch for registration events
//!
//! A small pub/sub map from event name to an ordered list of callbacks. The
//! dispatcher is an explicit object handed around by reference, not a
//! process-wide bus; the registration pipeline uses it for the
//! `settingRegistered` / `settingsReady` events and consumers may register
//! arbitrary custom events next to those.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Event emitted once per successfully registered setting
pub const SETTING_REGISTERED: &str = "settingRegistered";
/// Event emitted once after a whole register pass
pub const SETTINGS_READY: &str = "settingsReady";

/// Error type for hook registration
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Hook event name must be a non-empty string")]
    InvalidEventName,
}

/// Listener identity returned at registration time
///
/// Closures carry no usable identity of their own, so removal goes through
/// the id handed out here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

/// Callback signature listeners register with
pub type HookCallback = Box<dyn Fn(&Value) -> anyhow::Result<()> + Send + Sync>;

/// Event name -> ordered callback list
pub struct HookDispatcher {
    listeners: RwLock<HashMap<String, Vec<(HookId, HookCallback)>>>,
    next_id: AtomicU64,
}

impl HookDispatcher {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a callback for an event name
    pub fn register_hook(
        &self,
        event: &str,
        callback: HookCallback,
    ) -> Result<HookId, HookError> {
        if event.is_empty() {
            return Err(HookError::InvalidEventName);
        }
        let id = HookId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .entry(event.to_string())
            .or_default()
            .push((id, callback));
        Ok(id)
    }

    /// Invoke every callback registered for an event, in registration order
    ///
    /// A failing callback is logged and skipped; the rest still run. Returns
    /// the number of callbacks that completed without error.
    pub fn trigger(&self, event: &str, data: &Value) -> usize {
        let listeners = self.listeners.read();
        let callbacks = match listeners.get(event) {
            Some(callbacks) => callbacks,
            None => return 0,
        };

        let mut ran = 0;
        for (id, callback) in callbacks {
            match callback(data) {
                Ok(()) => ran += 1,
                Err(e) => {
                    tracing::warn!(event, hook_id = id.0, "hook callback failed: {}", e);
                }
            }
        }
        ran
    }

    /// Remove a previously registered callback; true if it was present
    pub fn remove_hook(&self, event: &str, id: HookId) -> bool {
        let mut listeners = self.listeners.write();
        let Some(callbacks) = listeners.get_mut(event) else {
            return false;
        };
        let before = callbacks.len();
        callbacks.retain(|(candidate, _)| *candidate != id);
        let removed = callbacks.len() != before;
        if callbacks.is_empty() {
            listeners.remove(event);
        }
        removed
    }

    /// Snapshot of event names and their listener counts
    pub fn registered_hooks(&self) -> HashMap<String, usize> {
        self.listeners
            .read()
            .iter()
            .map(|(event, callbacks)| (event.clone(), callbacks.len()))
            .collect()
    }
}

impl Default for HookDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
