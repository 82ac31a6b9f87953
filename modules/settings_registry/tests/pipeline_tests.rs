//! Integration tests for the settings registration pipeline

use serde_json::{json, Value};
use settings_registry::config::Config;
use settings_registry::contract::*;
use settings_registry::domain::hooks::{HookDispatcher, SETTINGS_READY, SETTING_REGISTERED};
use settings_registry::domain::validate::default_allowed_props;
use settings_registry::domain::visibility::ContextMapping;
use settings_registry::domain::{
    FieldRegistry, InMemorySettingsStore, OfflineSettingsStore, Parser, Registrar, Service,
    SettingsStore, StaticTranslator,
};
use settings_registry::RegistryModule;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

mod common;
use common::{bool_setting, number_setting, TestModuleSetup};

fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

fn print_report(label: &str, report: &RegistrationReport) {
    println!("\n========== Report: {} ==========", label);
    println!("  Processed: {}", report.processed);
    println!("  Successful: {}", report.successful);
    println!("  Succeeded: {:?}", report.succeeded);
    println!("  Planned excluded: {:?}", report.planned_excluded);
    println!("  Unplanned failed: {:?}", report.unplanned_failed);
    println!("  Messages: {:?}", report.messages);
    println!("=========================================\n");
}

// Mock store implementations for testing
pub mod mocks {
    use super::*;
    use async_trait::async_trait;

    /// Store that rejects one specific key and accepts everything else
    #[derive(Clone)]
    pub struct FlakyStore {
        pub inner: InMemorySettingsStore,
        pub reject: String,
    }

    impl FlakyStore {
        pub fn rejecting(key: &str) -> Self {
            Self {
                inner: InMemorySettingsStore::new(),
                reject: key.to_string(),
            }
        }
    }

    #[async_trait]
    impl SettingsStore for FlakyStore {
        fn is_ready(&self) -> bool {
            true
        }

        async fn register(
            &self,
            namespace: &str,
            key: &str,
            config: &SettingConfig,
        ) -> anyhow::Result<()> {
            if key == self.reject {
                anyhow::bail!("storage rejected '{}'", key);
            }
            self.inner.register(namespace, key, config).await
        }
    }
}

fn required_keys() -> Vec<String> {
    [
        "key",
        "config",
        "config.name",
        "config.hint",
        "config.scope",
        "config.type",
        "config.default",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn create_test_service(
    setup: &TestModuleSetup,
    store: Arc<dyn SettingsStore>,
) -> (Service, Arc<HookDispatcher>) {
    let dispatcher = Arc::new(HookDispatcher::new());
    let parser = Parser::new(
        required_keys(),
        default_allowed_props(),
        FieldRegistry::default(),
        setup.contexts(),
        ContextMapping::standard(),
        dispatcher.clone(),
    );
    let registrar = Registrar::new(
        setup.namespace.clone(),
        store,
        dispatcher.clone(),
        setup.contexts(),
        ContextMapping::standard(),
    )
    .expect("namespace is non-empty");
    let service = Service::new(parser, registrar, None, dispatcher.clone());
    (service, dispatcher)
}

#[tokio::test]
async fn test_parse_round_trip_all_valid() {
    let setup = TestModuleSetup::new();
    let (service, _dispatcher) = create_test_service(&setup, Arc::new(InMemorySettingsStore::new()));

    print_test_header(
        "test_parse_round_trip_all_valid",
        &["Verify that n valid, visible descriptors yield processed == successful == n with empty failure sets."],
    );
    setup.print_structure();

    let collection = json!([
        bool_setting("debugMode"),
        number_setting("fadeOpacity"),
        bool_setting("alsoFade"),
    ]);

    println!("\n📝 Stage 1: Parse 3 valid descriptors");
    let parsed = service.parse(&collection).expect("parse should succeed");
    print_report("after parse", &parsed.report);

    assert_eq!(parsed.report.processed, 3);
    assert_eq!(parsed.report.successful, 3);
    assert!(parsed.report.failed().is_empty());
    assert_eq!(
        parsed.report.succeeded,
        vec!["debugMode", "fadeOpacity", "alsoFade"]
    );

    println!("\n📝 Stage 2: Verify normalization output order matches input order");
    let keys: Vec<_> = parsed.settings.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["debugMode", "fadeOpacity", "alsoFade"]);
}

#[tokio::test]
async fn test_parse_canonicalizes_uppercase_boolean() {
    let setup = TestModuleSetup::new();
    let (service, _dispatcher) = create_test_service(&setup, Arc::new(InMemorySettingsStore::new()));

    print_test_header(
        "test_parse_canonicalizes_uppercase_boolean",
        &["Verify that a descriptor typed 'BOOLEAN' parses to the canonical boolean tag."],
    );

    let mut descriptor = bool_setting("debugMode");
    descriptor["config"]["type"] = json!("BOOLEAN");

    let parsed = service.parse(&json!([descriptor])).expect("parse should succeed");
    assert_eq!(parsed.settings[0].config.kind, SettingKind::Bool);
    assert_eq!(parsed.settings[0].config.default, json!(false));
}

#[tokio::test]
async fn test_parse_classifies_planned_exclusion() {
    let setup = TestModuleSetup::new().with_dev(false);
    let (service, _dispatcher) = create_test_service(&setup, Arc::new(InMemorySettingsStore::new()));

    print_test_header(
        "test_parse_classifies_planned_exclusion",
        &[
            "Verify that a descriptor hidden by showOnlyIfFlag lands in planned_excluded, not unplanned_failed.",
            "The manifest dev flag is false, so 'devTools' must be hidden on purpose.",
        ],
    );
    setup.print_structure();

    let mut hidden = bool_setting("devTools");
    hidden["showOnlyIfFlag"] = json!("manifest.dev");

    println!("\n📝 Stage 1: Parse one visible and one dev-only descriptor");
    let parsed = service
        .parse(&json!([bool_setting("debugMode"), hidden]))
        .expect("parse should succeed");
    print_report("after parse", &parsed.report);

    assert_eq!(parsed.report.processed, 2);
    assert_eq!(parsed.report.successful, 1);
    assert_eq!(parsed.report.planned_excluded, vec!["devTools"]);
    assert!(parsed.report.unplanned_failed.is_empty());
    assert!(parsed.report.failed().contains(&"devTools".to_string()));
}

#[tokio::test]
async fn test_parse_keyed_map_collection() {
    let setup = TestModuleSetup::new();
    let (service, _dispatcher) = create_test_service(&setup, Arc::new(InMemorySettingsStore::new()));

    print_test_header(
        "test_parse_keyed_map_collection",
        &["Verify that a map-shaped collection parses with map keys inherited as descriptor keys."],
    );

    let mut debug = bool_setting("ignored");
    debug.as_object_mut().unwrap().remove("key");
    let collection = json!({
        "debugMode": debug,
        "fadeOpacity": number_setting("fadeOpacity"),
    });

    let parsed = service.parse(&collection).expect("parse should succeed");
    print_report("after parse", &parsed.report);

    assert_eq!(parsed.report.processed, 2);
    assert_eq!(parsed.report.succeeded, vec!["debugMode", "fadeOpacity"]);
}

#[tokio::test]
async fn test_parse_boundary_errors() {
    let setup = TestModuleSetup::new();
    let (service, _dispatcher) = create_test_service(&setup, Arc::new(InMemorySettingsStore::new()));

    print_test_header(
        "test_parse_boundary_errors",
        &[
            "Verify the three boundary conditions of parse: bad shape, empty collection, all items invalid.",
            "These are the only conditions that raise instead of reporting inline.",
        ],
    );

    println!("\n📝 Stage 1: Non-collection input");
    let result = service.parse(&json!("not a collection"));
    assert!(matches!(result, Err(RegistryError::InvalidCollection { .. })));

    println!("📝 Stage 2: Empty collection");
    let result = service.parse(&json!([]));
    assert!(matches!(result, Err(RegistryError::NoValidSettings)));

    println!("📝 Stage 3: Collection where every descriptor is invalid");
    let result = service.parse(&json!([{"key": "broken"}, {"config": {}}]));
    match result {
        Err(RegistryError::AllSettingsInvalid { failed }) => {
            println!("   ✅ failed keys: {:?}", failed);
            assert_eq!(failed.len(), 2);
        }
        other => panic!("Expected AllSettingsInvalid, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_register_all_empty_batch_returns_zeroed_report() {
    let setup = TestModuleSetup::new();
    let (service, _dispatcher) = create_test_service(&setup, Arc::new(InMemorySettingsStore::new()));

    print_test_header(
        "test_register_all_empty_batch_returns_zeroed_report",
        &[
            "Verify that registering an empty batch reports success:false with zero counters and does NOT raise.",
            "This asymmetry with parse (which raises on empty input) is intentional and pinned here.",
        ],
    );

    let report = service.register_all(&[]).await;
    print_report("empty batch", &report);

    assert!(!report.is_success());
    assert_eq!(report.processed, 0);
    assert_eq!(report.successful, 0);
    assert!(report.failed().is_empty());
}

#[tokio::test]
async fn test_register_setting_when_store_not_ready() {
    let setup = TestModuleSetup::new();
    let (service, _dispatcher) = create_test_service(&setup, Arc::new(OfflineSettingsStore));

    print_test_header(
        "test_register_setting_when_store_not_ready",
        &["Verify that an unavailable settings subsystem yields a failure outcome mentioning 'not ready', without raising."],
    );

    let parsed_input = json!([bool_setting("debugMode")]);
    let parsed = {
        let (parse_service, _d) =
            create_test_service(&setup, Arc::new(InMemorySettingsStore::new()));
        parse_service.parse(&parsed_input).expect("parse should succeed")
    };

    let outcome = service.register_setting(&parsed.settings[0]).await;
    println!("   Outcome: {:?}", outcome);

    assert!(!outcome.success);
    assert!(outcome.message.contains("not ready"));
}

#[tokio::test]
async fn test_register_partial_success_still_counts_as_success() {
    let setup = TestModuleSetup::new();
    let store = Arc::new(mocks::FlakyStore::rejecting("fadeOpacity"));
    let (service, _dispatcher) = create_test_service(&setup, store.clone());

    print_test_header(
        "test_register_partial_success_still_counts_as_success",
        &[
            "Verify that a store rejection becomes an unplanned failure with the underlying message,",
            "and that the batch still reports overall success when at least one item registered.",
        ],
    );

    let parsed = service
        .parse(&json!([bool_setting("debugMode"), number_setting("fadeOpacity")]))
        .expect("parse should succeed");

    println!("\n📝 Stage 1: Register batch against a store rejecting 'fadeOpacity'");
    let report = service.register_all(&parsed.settings).await;
    print_report("after register", &report);

    assert!(report.is_success());
    assert_eq!(report.processed, 2);
    assert_eq!(report.successful, 1);
    assert_eq!(report.succeeded, vec!["debugMode"]);
    assert_eq!(report.unplanned_failed, vec!["fadeOpacity"]);
    assert!(report
        .messages
        .iter()
        .any(|m| m.contains("storage rejected 'fadeOpacity'")));

    println!("\n📝 Stage 2: Verify store contents");
    assert_eq!(store.inner.count(), 1);
    assert!(store.inner.get("tilefade", "debugMode").is_some());
}

#[tokio::test]
async fn test_registrar_applies_visibility_on_its_own() {
    let setup = TestModuleSetup::new().with_dev(false);
    let store = Arc::new(InMemorySettingsStore::new());
    let (service, _dispatcher) = create_test_service(&setup, store.clone());

    print_test_header(
        "test_registrar_applies_visibility_on_its_own",
        &[
            "Verify that registration re-evaluates visibility predicates, so a hidden descriptor",
            "handed directly to register_setting is refused with a non-fatal message.",
        ],
    );

    // build a normalized descriptor by hand, skipping the parse pass
    let parsed = service
        .parse(&json!([bool_setting("devTools")]))
        .expect("parse should succeed");
    let mut descriptor = parsed.settings[0].clone();
    descriptor.show_only_if = Some(json!("manifest.dev"));

    let outcome = service.register_setting(&descriptor).await;
    println!("   Outcome: {:?}", outcome);

    assert!(!outcome.success);
    assert!(outcome.message.contains("hidden"));
    assert_eq!(store.count(), 0);
}

#[tokio::test]
async fn test_change_hook_broadcasts_through_dispatcher() {
    let setup = TestModuleSetup::new();
    let (service, dispatcher) = create_test_service(&setup, Arc::new(InMemorySettingsStore::new()));

    print_test_header(
        "test_change_hook_broadcasts_through_dispatcher",
        &[
            "Verify that onChange.sendHook wires a callback broadcasting the new value under the",
            "explicit hook name, and that broadcast errors stay inside the dispatcher.",
        ],
    );

    let mut descriptor = number_setting("fadeOpacity");
    descriptor["config"]["onChange"] = json!({"sendHook": true, "hookName": "opacityChanged"});

    let parsed = service.parse(&json!([descriptor])).expect("parse should succeed");
    let hook = parsed.settings[0]
        .config
        .on_change
        .as_ref()
        .expect("hook should be wired");
    assert_eq!(hook.hook_name(), "opacityChanged");

    println!("\n📝 Stage 1: Register a healthy and a failing listener");
    let seen = Arc::new(parking_lot::RwLock::new(Vec::<Value>::new()));
    let seen_clone = seen.clone();
    dispatcher
        .register_hook(
            "opacityChanged",
            Box::new(move |value| {
                seen_clone.write().push(value.clone());
                Ok(())
            }),
        )
        .expect("hook registration");
    dispatcher
        .register_hook("opacityChanged", Box::new(|_| anyhow::bail!("listener broke")))
        .expect("hook registration");

    println!("📝 Stage 2: Invoke the change hook with a new value");
    hook.invoke(&json!(0.75));

    assert_eq!(seen.read().as_slice(), &[json!(0.75)]);
}

#[tokio::test]
async fn test_registration_events_are_emitted() {
    let setup = TestModuleSetup::new();
    let (service, dispatcher) = create_test_service(&setup, Arc::new(InMemorySettingsStore::new()));

    print_test_header(
        "test_registration_events_are_emitted",
        &["Verify that settingRegistered fires once per item and settingsReady once per batch."],
    );

    let registered = Arc::new(AtomicUsize::new(0));
    let ready = Arc::new(AtomicUsize::new(0));
    let registered_clone = registered.clone();
    let ready_clone = ready.clone();
    dispatcher
        .register_hook(
            SETTING_REGISTERED,
            Box::new(move |_| {
                registered_clone.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        )
        .expect("hook registration");
    dispatcher
        .register_hook(
            SETTINGS_READY,
            Box::new(move |data| {
                assert_eq!(data["namespace"], json!("tilefade"));
                ready_clone.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        )
        .expect("hook registration");

    let parsed = service
        .parse(&json!([bool_setting("debugMode"), number_setting("fadeOpacity")]))
        .expect("parse should succeed");
    let report = service.register_all(&parsed.settings).await;
    print_report("after register", &report);

    assert_eq!(registered.load(Ordering::SeqCst), 2);
    assert_eq!(ready.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_registrar_rejects_empty_namespace() {
    let setup = TestModuleSetup::new();

    print_test_header(
        "test_registrar_rejects_empty_namespace",
        &["Verify that building a registrar without a namespace is a construction-time error."],
    );

    let result = Registrar::new(
        "",
        Arc::new(InMemorySettingsStore::new()),
        Arc::new(HookDispatcher::new()),
        setup.contexts(),
        ContextMapping::standard(),
    );
    assert!(matches!(result, Err(RegistryError::MissingNamespace)));
}

#[tokio::test]
async fn test_module_full_pass_from_config() {
    print_test_header(
        "test_module_full_pass_from_config",
        &[
            "Drive the whole pipeline through the module facade: YAML config in, localized",
            "settings in the store out, with planned/unplanned buckets merged into one report.",
        ],
    );

    let config = Config::from_yaml_str(
        r#"
manifest:
  id: tilefade
  title: Tilefade
  version: "1.4.2"
  dev: false
settings:
  - key: debugMode
    config:
      name: TILEFADE.DebugName
      hint: TILEFADE.DebugHint
      scope: client
      type: boolean
      default: false
  - key: devTools
    showOnlyIfFlag: manifest.dev
    config:
      name: TILEFADE.DevToolsName
      hint: TILEFADE.DevToolsHint
      scope: client
      type: boolean
      default: false
  - key: broken
    config:
      name: ""
"#,
    )
    .expect("config should deserialize");

    let module = RegistryModule::new(config);
    let store = Arc::new(InMemorySettingsStore::new());
    let translator = Arc::new(StaticTranslator::from_entries([
        ("TILEFADE.DebugName", "Debug mode"),
        ("TILEFADE.DebugHint", "Log verbose fade decisions"),
    ]));

    println!("\n📝 Stage 1: Init module with in-memory store and translator");
    module
        .init(store.clone(), Some(translator), Default::default())
        .expect("init should succeed");

    println!("📝 Stage 2: Run the registration pass");
    let report = module
        .run_registration_pass()
        .await
        .expect("pass should succeed");
    print_report("full pass", &report);

    assert_eq!(report.processed, 3);
    assert_eq!(report.successful, 1);
    assert_eq!(report.succeeded, vec!["debugMode"]);
    assert_eq!(report.planned_excluded, vec!["devTools"]);
    assert_eq!(report.unplanned_failed, vec!["broken"]);

    println!("📝 Stage 3: Verify the stored config is localized");
    let stored = store.get("tilefade", "debugMode").expect("setting stored");
    assert_eq!(stored.name, "Debug mode");
    assert_eq!(stored.hint, "Log verbose fade decisions");
    assert_eq!(store.count(), 1);
}

#[tokio::test]
async fn test_native_client_delegates_to_service() {
    let setup = TestModuleSetup::new();
    let (service, _dispatcher) = create_test_service(&setup, Arc::new(InMemorySettingsStore::new()));
    let client = settings_registry::api::native::NativeClient::new(Arc::new(service));

    print_test_header(
        "test_native_client_delegates_to_service",
        &["Verify the native client exposes the same pipeline over the contract trait."],
    );

    let parsed = client
        .parse_settings(&json!([bool_setting("debugMode")]))
        .expect("parse should succeed");
    let report = client.register_settings(&parsed.settings).await;

    assert_eq!(report.successful, 1);
    assert!(report.is_success());
}
