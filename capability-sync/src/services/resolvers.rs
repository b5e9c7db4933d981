//! Sync operation resolvers.
//!
//! Pure functions deciding, for one classifier, whether the remote capability
//! must be enabled (and with which option), disabled, or left alone.

use crate::classifiers::{CapabilityClassifier, SyncStrategy};
use crate::error::SyncError;
use crate::models::{
    is_truthy, AdditionalOptions, DataProtectionOption, PushNotificationsOption,
    RemoteCapability, RemoteOptionValue, SyncOperation,
};
use serde_json::Value;

/// Resolve the operation for `classifier` given the existing remote
/// capability of its type (if any) and the desired entitlement value.
pub fn resolve_sync_operation(
    classifier: &CapabilityClassifier,
    existing: Option<&RemoteCapability>,
    value: &Value,
    options: &AdditionalOptions,
) -> Result<SyncOperation, SyncError> {
    let operation = match classifier.strategy {
        SyncStrategy::Boolean => resolve_boolean(existing, is_truthy(value)),
        SyncStrategy::Defined => resolve_defined(existing, is_truthy(value)),
        SyncStrategy::Settings { value: setting, .. } => resolve_settings(
            existing,
            is_truthy(value),
            RemoteOptionValue::ON,
            setting,
        ),
        SyncStrategy::DataProtection => {
            resolve_data_protection(classifier.entitlement, existing, value)?
        }
        SyncStrategy::PushNotifications => {
            resolve_push_notifications(existing, is_truthy(value), options)
        }
    };

    Ok(operation)
}

/// Explicit `enabled` flags are compared against `desired`. A capability
/// without the flag is boolean-shaped with no settings and counts as enabled:
/// it is never re-disabled here.
pub fn resolve_boolean(existing: Option<&RemoteCapability>, desired: bool) -> SyncOperation {
    match existing {
        Some(cap) => match cap.attributes.enabled {
            Some(enabled) if enabled == desired => SyncOperation::Skip,
            Some(_) if desired => SyncOperation::enable(RemoteOptionValue::ON),
            Some(_) => SyncOperation::Disable,
            None if cap.has_settings() && desired => SyncOperation::enable(RemoteOptionValue::ON),
            None => SyncOperation::Skip,
        },
        None if desired => SyncOperation::enable(RemoteOptionValue::ON),
        None => SyncOperation::Skip,
    }
}

/// Any defined value enables the capability. A bare existing capability is
/// already in sync; one carrying settings is re-enabled to resync it.
pub fn resolve_defined(existing: Option<&RemoteCapability>, defined: bool) -> SyncOperation {
    match existing {
        None if defined => SyncOperation::enable(RemoteOptionValue::ON),
        None => SyncOperation::Skip,
        Some(cap) if !cap.has_settings() => SyncOperation::Skip,
        Some(_) if defined => SyncOperation::enable(RemoteOptionValue::ON),
        Some(_) => SyncOperation::Disable,
    }
}

/// In sync only when the remote capability is enabled and its first setting
/// already holds `setting`.
pub fn resolve_settings(
    existing: Option<&RemoteCapability>,
    desired: bool,
    option: RemoteOptionValue,
    setting: &str,
) -> SyncOperation {
    match existing {
        None if desired => SyncOperation::enable(option),
        None => SyncOperation::Skip,
        Some(_) if !desired => SyncOperation::Disable,
        Some(cap) => {
            let enabled = cap.attributes.enabled.unwrap_or(false);
            if enabled && cap.first_setting_option() == Some(setting) {
                SyncOperation::Skip
            } else {
                SyncOperation::enable(option)
            }
        }
    }
}

pub fn resolve_data_protection(
    entitlement: &str,
    existing: Option<&RemoteCapability>,
    value: &Value,
) -> Result<SyncOperation, SyncError> {
    if !is_truthy(value) {
        return Ok(resolve_settings(existing, false, RemoteOptionValue::OFF, ""));
    }

    let option = value
        .as_str()
        .and_then(DataProtectionOption::from_entitlement)
        .ok_or_else(|| SyncError::invalid_entitlement(entitlement, value))?;

    Ok(resolve_settings(
        existing,
        true,
        RemoteOptionValue::DataProtection(option),
        option.as_str(),
    ))
}

/// Push is switched on by `aps-environment` and never switched off here.
/// Toggling broadcast always forces an update: the remote capability carries
/// settings exactly when broadcast is enabled.
pub fn resolve_push_notifications(
    existing: Option<&RemoteCapability>,
    enabled: bool,
    options: &AdditionalOptions,
) -> SyncOperation {
    if !enabled {
        return SyncOperation::Skip;
    }

    let broadcast = options.uses_broadcast_push_notifications;
    let option = RemoteOptionValue::PushNotifications(if broadcast {
        PushNotificationsOption::Broadcast
    } else {
        PushNotificationsOption::On
    });

    match existing {
        None => SyncOperation::enable(option),
        Some(cap) if cap.has_settings() != broadcast => SyncOperation::enable(option),
        Some(_) => SyncOperation::Skip,
    }
}
