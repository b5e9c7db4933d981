mod common;

use capability_sync::models::{
    AdditionalOptions, CapabilityAttributes, CapabilityType, DataProtectionOption,
    PushNotificationsOption, RemoteCapability, RemoteOptionValue, UpdateRequestEntry,
};
use capability_sync::{MockPortalClient, PortalError, SyncError};
use common::{entitlements, TestApp, APP_ID, EDIT_URL};
use serde_json::json;

fn broadcast() -> AdditionalOptions {
    AdditionalOptions {
        uses_broadcast_push_notifications: true,
    }
}

// =============================================================================
// End-to-end
// =============================================================================

#[tokio::test]
async fn enables_healthkit_on_empty_remote() {
    let app = TestApp::spawn();

    let result = app
        .reconciler()
        .reconcile(
            &app.app,
            &[],
            &entitlements(json!({ "com.apple.developer.healthkit": true })),
            &AdditionalOptions::default(),
        )
        .await
        .expect("Failed to reconcile");

    assert_eq!(
        result.update_batch,
        vec![UpdateRequestEntry::new(
            CapabilityType::HealthKit,
            RemoteOptionValue::ON
        )]
    );
    assert_eq!(result.enabled_names, vec!["HealthKit"]);
    assert!(result.disabled_names.is_empty());
    assert_eq!(app.portal.apply_count(), 1);

    let payload = serde_json::to_value(&app.portal.applied_batches()[0]).unwrap();
    assert_eq!(
        payload,
        json!([{ "capabilityType": "HEALTHKIT", "option": "ON" }])
    );
}

#[tokio::test]
async fn second_run_against_applied_state_is_a_no_op() {
    let portal = MockPortalClient::new().with_capabilities(vec![
        RemoteCapability::bare(APP_ID, CapabilityType::HomeKit),
        RemoteCapability::bare(APP_ID, CapabilityType::InAppPurchase),
        RemoteCapability::bare(APP_ID, CapabilityType::GameCenter),
    ]);
    let app = TestApp::with_portal(portal);
    let desired = entitlements(json!({
        "aps-environment": "production",
        "com.apple.developer.applesignin": ["Default"],
        "com.apple.developer.associated-domains": ["applinks:example.com"],
        "com.apple.developer.default-data-protection": "NSFileProtectionComplete",
        "com.apple.developer.healthkit": true,
        "com.apple.developer.icloud-container-identifiers": ["iCloud.com.example.app"],
    }));
    let options = AdditionalOptions::default();

    let first = app
        .reconciler()
        .reconcile(&app.app, &app.remote(), &desired, &options)
        .await
        .expect("Failed first reconcile");
    assert_eq!(first.enabled_names.len(), 6);
    assert_eq!(first.disabled_names, vec!["HomeKit"]);
    assert_eq!(app.portal.apply_count(), 1);

    let second = app
        .reconciler()
        .reconcile(&app.app, &app.remote(), &desired, &options)
        .await
        .expect("Failed second reconcile");
    assert!(second.update_batch.is_empty(), "{:?}", second.update_batch);
    assert!(second.enabled_names.is_empty());
    assert!(second.disabled_names.is_empty());
    assert_eq!(app.portal.apply_count(), 1);
}

// =============================================================================
// Boolean capabilities
// =============================================================================

#[tokio::test]
async fn bare_boolean_capability_is_already_in_sync() {
    let app = TestApp::spawn();
    let remote = vec![RemoteCapability::bare(APP_ID, CapabilityType::HealthKit)];

    let result = app
        .reconciler()
        .reconcile(
            &app.app,
            &remote,
            &entitlements(json!({ "com.apple.developer.healthkit": true })),
            &AdditionalOptions::default(),
        )
        .await
        .expect("Failed to reconcile");

    assert!(result.update_batch.is_empty());
    assert!(result.enabled_names.is_empty());
    assert_eq!(app.portal.apply_count(), 0);
}

#[tokio::test]
async fn disables_capability_without_entitlement() {
    let app = TestApp::spawn();
    let remote = vec![RemoteCapability::bare(APP_ID, CapabilityType::HomeKit)];

    let result = app
        .reconciler()
        .reconcile(
            &app.app,
            &remote,
            &entitlements(json!({})),
            &AdditionalOptions::default(),
        )
        .await
        .expect("Failed to reconcile");

    assert_eq!(result.disabled_names, vec!["HomeKit"]);
    assert_eq!(
        result.update_batch,
        vec![UpdateRequestEntry::disable(CapabilityType::HomeKit)]
    );
    assert_eq!(app.portal.apply_count(), 1);
}

#[tokio::test]
async fn explicit_capability_type_attribute_is_used_for_matching() {
    let app = TestApp::spawn();
    let remote = vec![RemoteCapability {
        id: "opaque-id".to_string(),
        attributes: CapabilityAttributes {
            capability_type: Some("HOMEKIT".to_string()),
            ..Default::default()
        },
    }];

    let result = app
        .reconciler()
        .reconcile(
            &app.app,
            &remote,
            &entitlements(json!({ "com.apple.developer.homekit": true })),
            &AdditionalOptions::default(),
        )
        .await
        .expect("Failed to reconcile");

    assert!(result.update_batch.is_empty());
}

// =============================================================================
// Exclusion list
// =============================================================================

#[tokio::test]
async fn default_capabilities_are_never_disabled() {
    let app = TestApp::spawn();
    let remote = vec![
        RemoteCapability::bare(APP_ID, CapabilityType::InAppPurchase),
        RemoteCapability::bare(APP_ID, CapabilityType::GameCenter),
        RemoteCapability::bare(APP_ID, CapabilityType::PushNotifications),
    ];

    let result = app
        .reconciler()
        .reconcile(
            &app.app,
            &remote,
            &entitlements(json!({})),
            &AdditionalOptions::default(),
        )
        .await
        .expect("Failed to reconcile");

    assert!(result.disabled_names.is_empty());
    assert!(result.update_batch.is_empty());
    assert_eq!(app.portal.apply_count(), 0);
}

// =============================================================================
// Data protection
// =============================================================================

#[tokio::test]
async fn data_protection_maps_to_remote_option() {
    let app = TestApp::spawn();

    let result = app
        .reconciler()
        .reconcile(
            &app.app,
            &[],
            &entitlements(json!({
                "com.apple.developer.default-data-protection": "NSFileProtectionCompleteUnlessOpen"
            })),
            &AdditionalOptions::default(),
        )
        .await
        .expect("Failed to reconcile");

    assert_eq!(
        result.update_batch,
        vec![UpdateRequestEntry::new(
            CapabilityType::DataProtection,
            RemoteOptionValue::DataProtection(DataProtectionOption::ProtectedUnlessOpen)
        )]
    );
    assert_eq!(result.enabled_names, vec!["Data Protection"]);
}

#[tokio::test]
async fn unsupported_data_protection_value_fails_before_any_call() {
    let app = TestApp::spawn();

    let err = app
        .reconciler()
        .reconcile(
            &app.app,
            &[],
            &entitlements(json!({
                "com.apple.developer.default-data-protection": "NSFileProtectionNone",
                "com.apple.developer.healthkit": true,
            })),
            &AdditionalOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::InvalidEntitlement { .. }));
    assert!(err
        .to_string()
        .contains("com.apple.developer.default-data-protection"));
    assert!(err.to_string().contains("NSFileProtectionNone"));
    assert_eq!(app.portal.apply_count(), 0);
}

// =============================================================================
// Push notifications
// =============================================================================

#[tokio::test]
async fn broadcast_flag_upgrades_existing_push_capability() {
    let app = TestApp::spawn();
    let remote = vec![RemoteCapability::bare(
        APP_ID,
        CapabilityType::PushNotifications,
    )];

    let result = app
        .reconciler()
        .reconcile(
            &app.app,
            &remote,
            &entitlements(json!({ "aps-environment": "production" })),
            &broadcast(),
        )
        .await
        .expect("Failed to reconcile");

    assert_eq!(result.enabled_names, vec!["Push Notifications"]);
    assert_eq!(
        result.update_batch,
        vec![UpdateRequestEntry::new(
            CapabilityType::PushNotifications,
            RemoteOptionValue::PushNotifications(PushNotificationsOption::Broadcast)
        )]
    );

    // The portal now reports broadcast settings; the same request is in sync.
    let again = app
        .reconciler()
        .reconcile(
            &app.app,
            &app.remote(),
            &entitlements(json!({ "aps-environment": "production" })),
            &broadcast(),
        )
        .await
        .expect("Failed to reconcile");
    assert!(again.update_batch.is_empty());
}

// =============================================================================
// Update errors
// =============================================================================

#[tokio::test]
async fn cannot_delete_error_links_to_portal() {
    let portal = MockPortalClient::new().fail_apply(PortalError::Api(
        "There is a problem with the request entity - The bundle 'U78L9459DG' cannot be deleted. Delete all the Apps related to this bundle to proceed."
            .to_string(),
    ));
    let app = TestApp::with_portal(portal);
    let remote = vec![RemoteCapability::bare(APP_ID, CapabilityType::HomeKit)];

    let err = app
        .reconciler()
        .reconcile(
            &app.app,
            &remote,
            &entitlements(json!({})),
            &AdditionalOptions::default(),
        )
        .await
        .unwrap_err();

    match &err {
        SyncError::UpdateRejected {
            app_identifier,
            edit_url,
            ..
        } => {
            assert_eq!(app_identifier, "com.example.app");
            assert_eq!(edit_url, &format!("{}/{}", EDIT_URL, APP_ID));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains(&format!("{}/{}", EDIT_URL, APP_ID)));
    assert_eq!(app.portal.apply_count(), 1);
}

#[tokio::test]
async fn other_update_errors_propagate_verbatim() {
    let portal =
        MockPortalClient::new().fail_apply(PortalError::Api("Service unavailable".to_string()));
    let app = TestApp::with_portal(portal);

    let err = app
        .reconciler()
        .reconcile(
            &app.app,
            &[],
            &entitlements(json!({ "com.apple.developer.healthkit": true })),
            &AdditionalOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Portal(PortalError::Api(_))));
    assert_eq!(err.to_string(), "API error: Service unavailable");
}
