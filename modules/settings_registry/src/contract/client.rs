//! Native client trait for inter-module communication
//!
//! This trait defines the API other modules use to drive the registration
//! pipeline. NO HTTP - direct function calls for performance.

use super::{
    error::RegistryError,
    model::{ParsedSettings, RegisterOutcome, RegistrationReport, SettingDescriptor},
};
use async_trait::async_trait;
use serde_json::Value;

/// Settings registry API for in-process consumers
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Parse and normalize a raw descriptor collection
    fn parse_settings(&self, collection: &Value) -> Result<ParsedSettings, RegistryError>;

    /// Localize descriptor text through the module's default translator
    fn localize_settings(&self, descriptors: &[SettingDescriptor]) -> Vec<SettingDescriptor>;

    /// Register one normalized descriptor
    async fn register_setting(&self, descriptor: &SettingDescriptor) -> RegisterOutcome;

    /// Register a batch of normalized descriptors
    async fn register_settings(&self, descriptors: &[SettingDescriptor]) -> RegistrationReport;

    /// Full pass: parse, localize, register, emit completion events
    async fn run_registration_pass(
        &self,
        collection: &Value,
    ) -> Result<RegistrationReport, RegistryError>;
}
