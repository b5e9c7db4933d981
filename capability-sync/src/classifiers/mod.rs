//! Capability classifier table.
//!
//! Each supported entitlement key maps to one [`CapabilityClassifier`]: the
//! remote capability it governs, how its value is validated and which
//! resolution strategy decides the sync operation. The table is static data;
//! lookups go through indexes built once on first use.

mod table;
pub mod validate;

use crate::error::SyncError;
use crate::models::{
    CapabilitySetting, CapabilityType, IdentifierKind, PushNotificationsOption, RemoteOptionValue,
    UpdateRequestEntry,
};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;

pub use validate::OptionsValidator;

pub const ICLOUD_VERSION: &str = "ICLOUD_VERSION";
pub const ICLOUD_XCODE_6: &str = "XCODE_6";
pub const DATA_PROTECTION_PERMISSION_LEVEL: &str = "DATA_PROTECTION_PERMISSION_LEVEL";
pub const APPLE_ID_AUTH_APP_CONSENT: &str = "APPLE_ID_AUTH_APP_CONSENT";
pub const APPLE_ID_AUTH_PRIMARY_APP_CONSENT: &str = "PRIMARY_APP_CONSENT";
pub const PUSH_NOTIFICATION_FEATURES: &str = "PUSH_NOTIFICATION_FEATURES";

/// Capabilities the platform enables by default. They are never disabled
/// just because no entitlement mentions them.
pub const EXCLUDED_FROM_DISABLE: &[CapabilityType] = &[
    CapabilityType::InAppPurchase,
    CapabilityType::PushNotifications,
    CapabilityType::GameCenter,
];

/// How a classifier turns (existing remote state, desired value) into a
/// sync operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// On/off capability driven by a boolean entitlement.
    Boolean,
    /// Enabled whenever the entitlement holds any value.
    Defined,
    /// Remote representation always carries one setting; in sync only when
    /// enabled and the setting holds `value`.
    Settings {
        key: &'static str,
        value: &'static str,
    },
    /// Settings comparison with the option derived from the entitlement.
    DataProtection,
    /// On/off from `aps-environment`, upgraded by the broadcast flag.
    PushNotifications,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityClassifier {
    pub name: &'static str,
    pub entitlement: &'static str,
    pub capability: CapabilityType,
    pub validator: OptionsValidator,
    pub strategy: SyncStrategy,
    pub identifier: Option<IdentifierKind>,
}

impl CapabilityClassifier {
    /// Validate `value`, failing with an error naming the entitlement.
    pub fn validate(&self, value: &Value) -> Result<(), SyncError> {
        if self.validator.validate(value) {
            Ok(())
        } else {
            Err(SyncError::invalid_entitlement(self.entitlement, value))
        }
    }
}

static BY_ENTITLEMENT: Lazy<HashMap<&'static str, &'static CapabilityClassifier>> =
    Lazy::new(|| table::CLASSIFIERS.iter().map(|c| (c.entitlement, c)).collect());

static BY_CAPABILITY: Lazy<HashMap<CapabilityType, &'static CapabilityClassifier>> =
    Lazy::new(|| table::CLASSIFIERS.iter().map(|c| (c.capability, c)).collect());

pub fn lookup_by_entitlement(key: &str) -> Option<&'static CapabilityClassifier> {
    BY_ENTITLEMENT.get(key).copied()
}

pub fn lookup_by_capability(capability: CapabilityType) -> Option<&'static CapabilityClassifier> {
    BY_CAPABILITY.get(&capability).copied()
}

pub fn all() -> &'static [CapabilityClassifier] {
    table::CLASSIFIERS
}

/// Classifiers that reference separately managed identifier resources.
pub fn with_identifiers() -> impl Iterator<Item = &'static CapabilityClassifier> {
    table::CLASSIFIERS.iter().filter(|c| c.identifier.is_some())
}

/// The settings payload the portal stores for an applied update entry.
///
/// Boolean-shaped capabilities carry no settings (`None`). Transport
/// implementations use this to encode the update; the mock client uses it to
/// model the resulting remote state.
pub fn settings_for_update(entry: &UpdateRequestEntry) -> Option<Vec<CapabilitySetting>> {
    if entry.is_disable() {
        return None;
    }

    let classifier = lookup_by_capability(entry.capability_type)?;
    match (classifier.strategy, entry.option) {
        (SyncStrategy::Settings { key, value }, _) => {
            Some(vec![CapabilitySetting::single(key, value)])
        }
        (SyncStrategy::DataProtection, RemoteOptionValue::DataProtection(option)) => Some(vec![
            CapabilitySetting::single(DATA_PROTECTION_PERMISSION_LEVEL, option.as_str()),
        ]),
        (
            SyncStrategy::PushNotifications,
            RemoteOptionValue::PushNotifications(PushNotificationsOption::Broadcast),
        ) => Some(vec![CapabilitySetting::single(
            PUSH_NOTIFICATION_FEATURES,
            PushNotificationsOption::Broadcast.as_str(),
        )]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataProtectionOption;
    use std::collections::HashSet;

    #[test]
    fn test_lookup_by_entitlement() {
        let healthkit = lookup_by_entitlement("com.apple.developer.healthkit").unwrap();
        assert_eq!(healthkit.name, "HealthKit");
        assert_eq!(healthkit.capability, CapabilityType::HealthKit);
        assert_eq!(healthkit.strategy, SyncStrategy::Boolean);

        assert!(lookup_by_entitlement("com.example.unknown").is_none());
    }

    #[test]
    fn test_lookup_by_capability() {
        let push = lookup_by_capability(CapabilityType::PushNotifications).unwrap();
        assert_eq!(push.entitlement, "aps-environment");
        assert!(lookup_by_capability(CapabilityType::InAppPurchase).is_none());
    }

    #[test]
    fn test_table_has_unique_keys_and_types() {
        let keys: HashSet<_> = all().iter().map(|c| c.entitlement).collect();
        let types: HashSet<_> = all().iter().map(|c| c.capability).collect();
        assert_eq!(keys.len(), all().len());
        assert_eq!(types.len(), all().len());
    }

    #[test]
    fn test_identifier_classifiers() {
        let kinds: Vec<_> = with_identifiers()
            .map(|c| (c.capability, c.identifier.unwrap()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (CapabilityType::ApplePay, IdentifierKind::MerchantId),
                (CapabilityType::AppGroups, IdentifierKind::AppGroup),
                (CapabilityType::ICloud, IdentifierKind::CloudContainer),
            ]
        );

        // Each identifier-backed entitlement validates with its kind's prefix.
        for classifier in with_identifiers() {
            let kind = classifier.identifier.unwrap();
            let good = serde_json::json!([format!("{}com.example", kind.prefix())]);
            assert!(classifier.validate(&good).is_ok(), "{}", classifier.name);
            assert!(classifier
                .validate(&serde_json::json!(["com.example"]))
                .is_err());
        }
    }

    #[test]
    fn test_validate_reports_entitlement_key() {
        let classifier = lookup_by_entitlement("aps-environment").unwrap();
        let err = classifier
            .validate(&serde_json::json!("staging"))
            .unwrap_err();
        assert!(err.to_string().contains("aps-environment"));
        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn test_settings_for_update() {
        let icloud = UpdateRequestEntry::new(CapabilityType::ICloud, RemoteOptionValue::ON);
        assert_eq!(
            settings_for_update(&icloud),
            Some(vec![CapabilitySetting::single(ICLOUD_VERSION, ICLOUD_XCODE_6)])
        );

        let data_protection = UpdateRequestEntry::new(
            CapabilityType::DataProtection,
            RemoteOptionValue::DataProtection(DataProtectionOption::ProtectedUnlessOpen),
        );
        assert_eq!(
            settings_for_update(&data_protection),
            Some(vec![CapabilitySetting::single(
                DATA_PROTECTION_PERMISSION_LEVEL,
                "PROTECTED_UNLESS_OPEN"
            )])
        );

        let push = UpdateRequestEntry::new(
            CapabilityType::PushNotifications,
            RemoteOptionValue::PushNotifications(PushNotificationsOption::On),
        );
        assert_eq!(settings_for_update(&push), None);

        let healthkit = UpdateRequestEntry::new(CapabilityType::HealthKit, RemoteOptionValue::ON);
        assert_eq!(settings_for_update(&healthkit), None);
        assert_eq!(
            settings_for_update(&UpdateRequestEntry::disable(CapabilityType::ICloud)),
            None
        );
    }
}
