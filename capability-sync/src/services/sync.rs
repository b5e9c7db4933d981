//! Entry point combining the identifier and capability passes into a single
//! portal update.

use super::capabilities::{apply_batch, plan};
use super::identifiers::IdentifierReconciler;
use super::metrics;
use crate::client::PortalClient;
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::models::{
    AdditionalOptions, AppIdentifierRef, CapabilitySyncResult, EntitlementsMap,
    IdentifierSyncResult, RemoteCapability, UpdateRequestEntry,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// What the current portal session is allowed to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccountAccess {
    /// Session with full account credentials.
    #[default]
    Full,
    /// API-key session; identifier resources cannot be listed or created.
    ApiKeyOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Capability syncing is switched off.
    Disabled,
    /// The identifier pass is switched off.
    IdentifierSyncDisabled,
    /// The identifier pass needs full account access.
    LimitedAccountAccess,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::IdentifierSyncDisabled => "identifier_sync_disabled",
            Self::LimitedAccountAccess => "limited_account_access",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncRequest<'a> {
    pub app: &'a AppIdentifierRef,
    pub remote_capabilities: &'a [RemoteCapability],
    pub entitlements: &'a EntitlementsMap,
    pub options: AdditionalOptions,
    pub access: AccountAccess,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub capabilities: CapabilitySyncResult,
    pub identifiers: Option<IdentifierSyncResult>,
    /// The merged batch that was submitted. Empty when nothing changed.
    pub update_batch: Vec<UpdateRequestEntry>,
    pub skipped: Vec<SkipReason>,
}

impl SyncOutcome {
    pub fn is_skipped(&self) -> bool {
        self.skipped.contains(&SkipReason::Disabled)
    }
}

pub struct CapabilitySync {
    client: Arc<dyn PortalClient>,
    config: SyncConfig,
}

impl CapabilitySync {
    pub fn new(client: Arc<dyn PortalClient>, config: SyncConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Plan the capability diff, run the identifier pass when allowed and
    /// submit both in one apply call.
    #[instrument(
        skip_all,
        fields(app = %request.app.identifier, access = ?request.access)
    )]
    pub async fn sync(&self, request: SyncRequest<'_>) -> Result<SyncOutcome, SyncError> {
        let mut outcome = SyncOutcome::default();

        if !self.config.capability_sync_enabled {
            info!("Capability sync is disabled, skipping");
            outcome.skipped.push(SkipReason::Disabled);
            return Ok(outcome);
        }

        let _timer = metrics::start_sync_timer("sync");

        // Validates every entitlement before the first portal call.
        outcome.capabilities = plan(
            request.remote_capabilities,
            request.entitlements,
            &request.options,
        )
        .inspect_err(|e| metrics::record_error(e.kind()))?;

        let identifier_skip = if !self.config.identifier_sync_enabled {
            Some(SkipReason::IdentifierSyncDisabled)
        } else if request.access == AccountAccess::ApiKeyOnly {
            Some(SkipReason::LimitedAccountAccess)
        } else {
            None
        };

        match identifier_skip {
            Some(reason) => {
                info!(reason = reason.as_str(), "Skipping capability identifier sync");
                outcome.skipped.push(reason);
            }
            None => {
                let identifiers = IdentifierReconciler::new(self.client.clone())
                    .reconcile_identifiers(request.entitlements)
                    .await?;
                outcome.identifiers = Some(identifiers);
            }
        }

        let mut batch = outcome.capabilities.update_batch.clone();
        if let Some(identifiers) = &outcome.identifiers {
            merge_relationships(&mut batch, &identifiers.relationship_batch);
        }

        apply_batch(
            self.client.as_ref(),
            request.app,
            &batch,
            &self.config.portal_edit_url,
        )
        .await?;

        outcome.update_batch = batch;
        Ok(outcome)
    }
}

/// Fold relationship entries into `batch`, keeping at most one entry per
/// capability type. An entry already present for the type receives the
/// relationships; otherwise the relationship entry is appended as is.
pub fn merge_relationships(
    batch: &mut Vec<UpdateRequestEntry>,
    relationships: &[UpdateRequestEntry],
) {
    for rel in relationships {
        match batch
            .iter_mut()
            .find(|entry| entry.capability_type == rel.capability_type)
        {
            Some(entry) => {
                if let Some(incoming) = &rel.relationships {
                    entry
                        .relationships
                        .get_or_insert_with(Default::default)
                        .extend(incoming.iter().map(|(k, v)| (*k, v.clone())));
                }
            }
            None => batch.push(rel.clone()),
        }
    }
}
