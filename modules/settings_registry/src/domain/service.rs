//! Domain service - registration pass orchestration

use crate::contract::{
    ParsedSettings, RegisterOutcome, RegistrationReport, RegistryError, SettingDescriptor,
};
use crate::domain::hooks::HookDispatcher;
use crate::domain::localize::{localize_settings, Translator};
use crate::domain::parser::Parser;
use crate::domain::registrar::Registrar;
use serde_json::Value;
use std::sync::Arc;

/// Domain service tying the pipeline stages together
///
/// Raw descriptor list -> validate/visibility -> parse/normalize -> localize
/// -> register -> completion events, in that order, one item at a time.
pub struct Service {
    parser: Parser,
    registrar: Registrar,
    default_translator: Option<Arc<dyn Translator>>,
    dispatcher: Arc<HookDispatcher>,
}

impl Service {
    pub fn new(
        parser: Parser,
        registrar: Registrar,
        default_translator: Option<Arc<dyn Translator>>,
        dispatcher: Arc<HookDispatcher>,
    ) -> Self {
        Self {
            parser,
            registrar,
            default_translator,
            dispatcher,
        }
    }

    /// The dispatcher consumers register custom hooks on
    pub fn dispatcher(&self) -> &Arc<HookDispatcher> {
        &self.dispatcher
    }

    /// Parse and normalize a raw descriptor collection
    pub fn parse(&self, collection: &Value) -> Result<ParsedSettings, RegistryError> {
        self.parser.parse(collection)
    }

    /// Localize descriptor text through the custom or default translator
    pub fn localize(
        &self,
        descriptors: &[SettingDescriptor],
        custom: Option<&dyn Translator>,
    ) -> Vec<SettingDescriptor> {
        localize_settings(descriptors, custom, self.default_translator.as_deref())
    }

    /// Register one normalized descriptor
    pub async fn register_setting(&self, descriptor: &SettingDescriptor) -> RegisterOutcome {
        self.registrar.register_setting(descriptor).await
    }

    /// Register a batch of normalized descriptors
    pub async fn register_all(&self, descriptors: &[SettingDescriptor]) -> RegistrationReport {
        self.registrar.register_all(descriptors).await
    }

    /// Full pass: parse, localize, register, and merge the two reports
    ///
    /// The merged report keeps the parse pass's planned/unplanned buckets and
    /// adds whatever the register pass classified on top, so
    /// `successful + failed == processed` still holds for the whole run.
    pub async fn run_registration_pass(
        &self,
        collection: &Value,
    ) -> Result<RegistrationReport, RegistryError> {
        let parsed = self.parse(collection)?;
        let localized = self.localize(&parsed.settings, None);
        let registered = self.register_all(&localized).await;

        let mut report = RegistrationReport::new();
        report.processed = parsed.report.processed;
        report.successful = registered.successful;
        report.succeeded = registered.succeeded;
        report.planned_excluded = parsed.report.planned_excluded;
        report.planned_excluded.extend(registered.planned_excluded);
        report.unplanned_failed = parsed.report.unplanned_failed;
        report.unplanned_failed.extend(registered.unplanned_failed);
        report.messages = registered.messages;
        report.completed_at = registered.completed_at;
        Ok(report)
    }
}
