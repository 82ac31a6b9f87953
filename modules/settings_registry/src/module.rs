//! Module declaration and wiring
//!
//! Binds the configuration, the injected host adapters (settings store,
//! translator), and the hook dispatcher into a ready domain service. This is
//! the piece a host embedding constructs once at startup.

use crate::config::Config;
use crate::contract::RegistrationReport;
use crate::domain::hooks::HookDispatcher;
use crate::domain::kind::FieldRegistry;
use crate::domain::localize::Translator;
use crate::domain::parser::Parser;
use crate::domain::registrar::Registrar;
use crate::domain::store::SettingsStore;
use crate::domain::visibility::ContextSet;
use crate::domain::Service;
use anyhow::Result;
use parking_lot::RwLock;
use std::sync::Arc;

/// Settings registry module
pub struct RegistryModule {
    config: RwLock<Config>,
    service: RwLock<Option<Arc<Service>>>,
}

impl RegistryModule {
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            service: RwLock::new(None),
        }
    }

    /// Wire the domain service from config and the injected host adapters
    ///
    /// `host_contexts` carries the trees only the host can supply (platform,
    /// user, world, the module's own live configuration); the manifest and
    /// constants trees are filled in from the module config here.
    pub fn init(
        &self,
        store: Arc<dyn SettingsStore>,
        translator: Option<Arc<dyn Translator>>,
        host_contexts: ContextSet,
    ) -> Result<()> {
        let cfg = self.config.read().clone();

        let dispatcher = Arc::new(HookDispatcher::new());

        let mut registry = FieldRegistry::default();
        for (name, canonical) in &cfg.field_types {
            registry.insert(name.clone(), canonical.clone());
        }

        let mut contexts = host_contexts;
        contexts.manifest = serde_json::to_value(&cfg.manifest)?;
        contexts.constants = cfg.constants.clone();

        let parser = Parser::new(
            cfg.required_keys.clone(),
            cfg.allowed_props.clone(),
            registry,
            contexts.clone(),
            cfg.context_mapping.clone(),
            Arc::clone(&dispatcher),
        );
        let registrar = Registrar::new(
            cfg.manifest.id.clone(),
            store,
            Arc::clone(&dispatcher),
            contexts,
            cfg.context_mapping.clone(),
        )?;

        let service = Arc::new(Service::new(parser, registrar, translator, dispatcher));
        *self.service.write() = Some(service);

        tracing::info!(namespace = %cfg.manifest.id, "settings registry initialized");
        Ok(())
    }

    /// The wired domain service, once `init` has run
    pub fn service(&self) -> Option<Arc<Service>> {
        self.service.read().clone()
    }

    /// Native client over the wired service
    pub fn client(&self) -> Option<crate::api::native::NativeClient> {
        self.service().map(crate::api::native::NativeClient::new)
    }

    /// Run the full registration pass over the configured descriptor list
    pub async fn run_registration_pass(&self) -> Result<RegistrationReport> {
        let service = self
            .service()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;
        let settings = self.config.read().settings.clone();
        let report = service.run_registration_pass(&settings).await?;
        Ok(report)
    }
}
