//! Common test utilities for capability-sync integration tests.

use capability_sync::config::SyncConfig;
use capability_sync::models::{AppIdentifierRef, EntitlementsMap, RemoteCapability};
use capability_sync::{
    CapabilityReconciler, CapabilitySync, IdentifierReconciler, MockPortalClient,
};
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

pub const APP_ID: &str = "U78L9459DG";
pub const BUNDLE_ID: &str = "com.example.app";
pub const EDIT_URL: &str = "https://developer.apple.com/account/resources/identifiers/bundleId/edit";

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,capability_sync=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn app() -> AppIdentifierRef {
    AppIdentifierRef {
        id: APP_ID.to_string(),
        identifier: BUNDLE_ID.to_string(),
    }
}

/// Build an entitlements map from a JSON object literal.
pub fn entitlements(value: serde_json::Value) -> EntitlementsMap {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("entitlements fixture must be an object, got {other}"),
    }
}

/// Test harness around a mock portal.
#[allow(dead_code)]
pub struct TestApp {
    pub portal: Arc<MockPortalClient>,
    pub app: AppIdentifierRef,
    pub config: SyncConfig,
}

#[allow(dead_code)]
impl TestApp {
    pub fn spawn() -> Self {
        Self::with_portal(MockPortalClient::new())
    }

    pub fn with_portal(portal: MockPortalClient) -> Self {
        init_tracing();
        Self {
            portal: Arc::new(portal),
            app: app(),
            config: SyncConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    pub fn reconciler(&self) -> CapabilityReconciler {
        CapabilityReconciler::new(self.portal.clone(), EDIT_URL)
    }

    pub fn identifier_reconciler(&self) -> IdentifierReconciler {
        IdentifierReconciler::new(self.portal.clone())
    }

    pub fn sync(&self) -> CapabilitySync {
        CapabilitySync::new(self.portal.clone(), self.config.clone())
    }

    /// Remote capabilities as a fresh fetch would return them.
    pub fn remote(&self) -> Vec<RemoteCapability> {
        self.portal.capabilities()
    }
}
