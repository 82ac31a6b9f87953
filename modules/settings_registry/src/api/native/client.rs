//! Native client implementation - wraps the domain service for in-process calls

use crate::contract::{
    ParsedSettings, RegisterOutcome, RegistrationReport, RegistryApi, RegistryError,
    SettingDescriptor,
};
use crate::domain::Service;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Native client implementation that directly calls the domain service
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RegistryApi for NativeClient {
    fn parse_settings(&self, collection: &Value) -> Result<ParsedSettings, RegistryError> {
        self.service.parse(collection)
    }

    fn localize_settings(&self, descriptors: &[SettingDescriptor]) -> Vec<SettingDescriptor> {
        self.service.localize(descriptors, None)
    }

    async fn register_setting(&self, descriptor: &SettingDescriptor) -> RegisterOutcome {
        self.service.register_setting(descriptor).await
    }

    async fn register_settings(&self, descriptors: &[SettingDescriptor]) -> RegistrationReport {
        self.service.register_all(descriptors).await
    }

    async fn run_registration_pass(
        &self,
        collection: &Value,
    ) -> Result<RegistrationReport, RegistryError> {
        self.service.run_registration_pass(collection).await
    }
}
