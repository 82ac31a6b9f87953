//! Common test utilities and shared module configuration

use serde_json::{json, Value};
use settings_registry::domain::visibility::ContextSet;

/// Realistic module setup for testing
/// Manifest + constants the way a tile-fading module would ship them
#[derive(Debug, Clone)]
pub struct TestModuleSetup {
    pub namespace: String,
    pub manifest: Value,
    pub constants: Value,
}

impl TestModuleSetup {
    /// Create the default setup: release manifest, beta flag on
    pub fn new() -> Self {
        Self {
            namespace: "tilefade".to_string(),
            manifest: json!({
                "id": "tilefade",
                "title": "Tilefade",
                "version": "1.4.2",
                "dev": false,
                "flags": {"beta": true}
            }),
            constants: json!({
                "maxTiles": 64,
                "defaultOpacity": 0.3
            }),
        }
    }

    /// Same setup with the manifest dev flag switched
    pub fn with_dev(mut self, dev: bool) -> Self {
        self.manifest["dev"] = json!(dev);
        self
    }

    /// Context trees as the visibility evaluator sees them
    pub fn contexts(&self) -> ContextSet {
        ContextSet {
            manifest: self.manifest.clone(),
            constants: self.constants.clone(),
            ..Default::default()
        }
    }

    /// Print the setup structure
    pub fn print_structure(&self) {
        println!("\n📊 Module Setup:");
        println!("   Namespace: {}", self.namespace);
        println!("   Manifest: {}", self.manifest);
        println!("   Constants: {}", self.constants);
    }
}

impl Default for TestModuleSetup {
    fn default() -> Self {
        Self::new()
    }
}

/// A complete boolean descriptor, valid against the default rules
pub fn bool_setting(key: &str) -> Value {
    json!({
        "key": key,
        "config": {
            "name": format!("TILEFADE.{}Name", key),
            "hint": format!("TILEFADE.{}Hint", key),
            "scope": "client",
            "config": true,
            "type": "boolean",
            "default": false
        }
    })
}

/// A complete number descriptor with a range, valid against the default rules
pub fn number_setting(key: &str) -> Value {
    json!({
        "key": key,
        "config": {
            "name": format!("TILEFADE.{}Name", key),
            "hint": format!("TILEFADE.{}Hint", key),
            "scope": "world",
            "config": true,
            "type": "number",
            "default": 0.3,
            "range": {"min": 0.0, "max": 1.0, "step": 0.05}
        }
    })
}
