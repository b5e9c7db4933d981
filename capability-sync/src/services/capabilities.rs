//! Capability reconciler.
//!
//! Diffs the desired entitlements against the capabilities already registered
//! for an app identifier and submits the difference as one batched update.

use super::metrics;
use super::resolvers::resolve_sync_operation;
use crate::classifiers::{lookup_by_capability, lookup_by_entitlement, EXCLUDED_FROM_DISABLE};
use crate::client::{PortalClient, PortalError};
use crate::error::SyncError;
use crate::models::{
    is_truthy, AdditionalOptions, AppIdentifierRef, CapabilitySyncResult, EntitlementsMap,
    RemoteCapability, SyncOperation, UpdateRequestEntry,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::instrument;

static CANNOT_DELETE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"bundle '[\w\d]+' cannot be deleted\. Delete all the Apps")
        .expect("Invalid CANNOT_DELETE pattern")
});

/// Compute the update batch without touching the network.
///
/// Fails on the first entitlement whose value does not validate, so nothing
/// is ever partially applied.
pub fn plan(
    remote: &[RemoteCapability],
    entitlements: &EntitlementsMap,
    options: &AdditionalOptions,
) -> Result<CapabilitySyncResult, SyncError> {
    let _timer = metrics::start_sync_timer("plan");

    let mut remaining: Vec<&RemoteCapability> = remote.iter().collect();
    let mut result = CapabilitySyncResult::default();

    for (key, value) in entitlements.iter().filter(|(_, v)| is_truthy(v)) {
        let Some(classifier) = lookup_by_entitlement(key) else {
            tracing::debug!(entitlement = %key, "Skipping unmanaged entitlement");
            continue;
        };

        classifier.validate(value)?;

        let position = remaining
            .iter()
            .position(|cap| cap.is_type(classifier.capability));
        let existing = position.map(|i| remaining[i]);

        let operation = resolve_sync_operation(classifier, existing, value, options)?;

        tracing::debug!(
            capability = %classifier.capability,
            operation = operation.as_str(),
            "Resolved sync operation"
        );

        match operation {
            SyncOperation::Enable { option } => {
                result
                    .update_batch
                    .push(UpdateRequestEntry::new(classifier.capability, option));
                result.enabled_names.push(classifier.name.to_string());
            }
            SyncOperation::Disable => {
                result
                    .update_batch
                    .push(UpdateRequestEntry::disable(classifier.capability));
                result.disabled_names.push(classifier.name.to_string());
            }
            SyncOperation::Skip => {}
        }

        if let Some(i) = position {
            remaining.remove(i);
        }
    }

    for cap in remaining {
        let Some(capability) = cap.capability_type() else {
            tracing::debug!(id = %cap.id, "Skipping remote capability of unknown type");
            continue;
        };

        if EXCLUDED_FROM_DISABLE.contains(&capability) {
            continue;
        }

        let Some(classifier) = lookup_by_capability(capability) else {
            continue;
        };

        if result
            .update_batch
            .iter()
            .any(|entry| entry.capability_type == capability)
        {
            continue;
        }

        result
            .update_batch
            .push(UpdateRequestEntry::disable(capability));
        result.disabled_names.push(classifier.name.to_string());
    }

    Ok(result)
}

/// Submit `batch` in a single apply call. Empty batches issue no call.
pub async fn apply_batch(
    client: &dyn PortalClient,
    app: &AppIdentifierRef,
    batch: &[UpdateRequestEntry],
    edit_url: &str,
) -> Result<(), SyncError> {
    if batch.is_empty() {
        tracing::debug!(app = %app.identifier, "Capabilities already in sync");
        return Ok(());
    }

    for entry in batch {
        metrics::record_sync_operation(if entry.is_disable() { "disable" } else { "enable" });
    }

    tracing::debug!(app = %app.identifier, payload = ?batch, "Submitting capability updates");

    match client.apply_capability_updates(app, batch).await {
        Ok(()) => {
            metrics::record_apply_request("success");
            tracing::info!(
                app = %app.identifier,
                entries = batch.len(),
                "Applied capability updates"
            );
            Ok(())
        }
        Err(e) => {
            metrics::record_apply_request("failure");
            tracing::error!("Failed to apply capability updates for {}: {}", app.identifier, e);
            let err = augment_update_error(app, e, edit_url);
            metrics::record_error(err.kind());
            Err(err)
        }
    }
}

/// Attach the portal edit link when the portal refuses to delete a
/// capability that other apps still depend on.
pub fn augment_update_error(
    app: &AppIdentifierRef,
    error: PortalError,
    edit_url: &str,
) -> SyncError {
    if CANNOT_DELETE.is_match(&error.to_string()) {
        SyncError::UpdateRejected {
            app_identifier: app.identifier.clone(),
            edit_url: format!("{}/{}", edit_url.trim_end_matches('/'), app.id),
            source: error,
        }
    } else {
        SyncError::Portal(error)
    }
}

pub struct CapabilityReconciler {
    client: Arc<dyn PortalClient>,
    edit_url: String,
}

impl CapabilityReconciler {
    pub fn new(client: Arc<dyn PortalClient>, edit_url: impl Into<String>) -> Self {
        Self {
            client,
            edit_url: edit_url.into(),
        }
    }

    /// Plan and apply. Issues exactly one apply call when there is anything
    /// to change and none otherwise.
    #[instrument(
        skip_all,
        fields(app = %app.identifier, remote = remote.len())
    )]
    pub async fn reconcile(
        &self,
        app: &AppIdentifierRef,
        remote: &[RemoteCapability],
        entitlements: &EntitlementsMap,
        options: &AdditionalOptions,
    ) -> Result<CapabilitySyncResult, SyncError> {
        let result = plan(remote, entitlements, options).inspect_err(|e| {
            metrics::record_error(e.kind());
        })?;

        apply_batch(
            self.client.as_ref(),
            app,
            &result.update_batch,
            &self.edit_url,
        )
        .await?;

        if !result.enabled_names.is_empty() || !result.disabled_names.is_empty() {
            tracing::info!(
                app = %app.identifier,
                enabled = ?result.enabled_names,
                disabled = ?result.disabled_names,
                "Synced capabilities"
            );
        }

        Ok(result)
    }
}
