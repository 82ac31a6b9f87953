//! Contract models for the settings registry
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models. Raw descriptors arrive as
//! `serde_json::Value` records and are normalized into these types by the
//! parsing pass.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// Scope a setting is persisted under in the host settings store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingScope {
    /// Shared by every connected client
    World,
    /// Per-installation, browser-local
    Client,
    /// Per-user account
    User,
}

impl SettingScope {
    /// Parse the wire tag used in raw descriptors
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "world" => Some(Self::World),
            "client" => Some(Self::Client),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::World => "world",
            Self::Client => "client",
            Self::User => "user",
        }
    }
}

/// Canonical value type tag for a setting
///
/// String inputs are mapped case-insensitively to the primitive tags;
/// anything else is resolved against the field registry and, failing that,
/// kept verbatim as `Raw` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingKind {
    Bool,
    Number,
    Text,
    Object,
    Array,
    /// A host data-field or data-model reference resolved from the registry
    Field(String),
    /// Unresolved type string, preserved as authored
    Raw(String),
}

impl SettingKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::Text => "string",
            Self::Object => "object",
            Self::Array => "array",
            Self::Field(name) => name,
            Self::Raw(name) => name,
        }
    }
}

/// Numeric bounds for number-typed settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
    pub step: Option<f64>,
}

/// Change callback installed by the parsing pass
///
/// Wraps the broadcast closure wired to the hook dispatcher so the host can
/// invoke it with the new value whenever the setting changes. Broadcast
/// failures are handled inside the closure and never reach the caller.
#[derive(Clone)]
pub struct ChangeHook {
    hook_name: String,
    callback: Arc<dyn Fn(&serde_json::Value) + Send + Sync>,
}

impl ChangeHook {
    pub fn new(
        hook_name: impl Into<String>,
        callback: Arc<dyn Fn(&serde_json::Value) + Send + Sync>,
    ) -> Self {
        Self {
            hook_name: hook_name.into(),
            callback,
        }
    }

    /// Event name this hook broadcasts under
    pub fn hook_name(&self) -> &str {
        &self.hook_name
    }

    /// Invoke the callback with the new setting value
    pub fn invoke(&self, value: &serde_json::Value) {
        (self.callback)(value);
    }
}

impl fmt::Debug for ChangeHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ChangeHook").field(&self.hook_name).finish()
    }
}

/// Presentation and behavior fields of a normalized setting
#[derive(Debug, Clone)]
pub struct SettingConfig {
    /// Human-readable label (localization key until localized)
    pub name: String,
    /// Human-readable description (localization key until localized)
    pub hint: String,
    /// Persistence scope
    pub scope: SettingScope,
    /// Whether the setting is shown in the host's configuration menu
    pub menu: bool,
    /// Canonical value type tag
    pub kind: SettingKind,
    /// Default value, matching `kind`
    pub default: serde_json::Value,
    /// Optional enumerated value -> label map
    pub choices: Option<serde_json::Map<String, serde_json::Value>>,
    /// Optional numeric bounds
    pub range: Option<NumericRange>,
    /// Optional change broadcast wired by the parsing pass
    pub on_change: Option<ChangeHook>,
}

/// A single setting's normalized declarative definition
#[derive(Debug, Clone)]
pub struct SettingDescriptor {
    /// Unique identifier within the namespace
    pub key: String,
    /// Presentation/behavior fields
    pub config: SettingConfig,
    /// Visibility predicate: show only when this expression is true
    pub show_only_if: Option<serde_json::Value>,
    /// Visibility predicate: hide when this expression is true
    pub dont_show_if: Option<serde_json::Value>,
}

/// Per-item registration result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterOutcome {
    pub success: bool,
    pub message: String,
}

impl RegisterOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Outcome of one parse pass
#[derive(Debug, Clone)]
pub struct ParsedSettings {
    /// Normalized descriptors, in input order
    pub settings: Vec<SettingDescriptor>,
    /// Aggregate counts and failure classification
    pub report: RegistrationReport,
}

/// Aggregate outcome of one parse or register pass
///
/// `planned_excluded` and `unplanned_failed` are always present (possibly
/// empty) so callers can tell "intentionally off" apart from "broken".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReport {
    /// Total items attempted
    pub processed: usize,
    /// Items that passed
    pub successful: usize,
    /// Keys that succeeded, in input order
    pub succeeded: Vec<String>,
    /// Keys hidden by a visibility predicate
    pub planned_excluded: Vec<String>,
    /// Keys that failed validation or registration
    pub unplanned_failed: Vec<String>,
    /// Per-item failure messages collected during a register pass
    pub messages: Vec<String>,
    /// When the pass finished
    pub completed_at: DateTime<Utc>,
}

impl RegistrationReport {
    pub fn new() -> Self {
        Self {
            processed: 0,
            successful: 0,
            succeeded: Vec::new(),
            planned_excluded: Vec::new(),
            unplanned_failed: Vec::new(),
            messages: Vec::new(),
            completed_at: Utc::now(),
        }
    }

    /// All keys that did not succeed, planned exclusions first
    pub fn failed(&self) -> Vec<String> {
        let mut keys = self.planned_excluded.clone();
        keys.extend(self.unplanned_failed.iter().cloned());
        keys
    }

    /// Batch-level success: at least one item passed
    pub fn is_success(&self) -> bool {
        self.successful > 0
    }
}

impl Default for RegistrationReport {
    fn default() -> Self {
        Self::new()
    }
}
