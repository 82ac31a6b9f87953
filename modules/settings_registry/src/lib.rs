//! Settings Registry Module
//!
//! Declarative settings registration pipeline for host-embedded modules.
//! Descriptors are authored as static configuration, validated against a
//! required-key list and a property allow-list, filtered by visibility
//! predicates over named context trees, normalized, localized, and pushed
//! into the host's settings store with per-item outcome tracking.

// Public exports
pub mod contract;
pub use contract::{
    client::RegistryApi, error::RegistryError, ChangeHook, NumericRange, ParsedSettings,
    RegisterOutcome, RegistrationReport, SettingConfig, SettingDescriptor, SettingKind,
    SettingScope,
};

pub mod module;
pub use module::RegistryModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
