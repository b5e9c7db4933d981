//! Capability identifier reconciler.
//!
//! Makes sure every merchant id, app group and iCloud container named in the
//! entitlements exists on the account, and builds the relationship entries
//! that link them to the app identifier.

use super::metrics;
use crate::classifiers::{validate::string_items, with_identifiers, CapabilityClassifier};
use crate::client::PortalClient;
use crate::error::SyncError;
use crate::models::{
    is_truthy, EntitlementsMap, IdentifierKind, IdentifierSyncResult, UpdateRequestEntry,
};
use std::sync::Arc;
use tracing::instrument;

pub struct IdentifierReconciler {
    client: Arc<dyn PortalClient>,
}

impl IdentifierReconciler {
    pub fn new(client: Arc<dyn PortalClient>) -> Self {
        Self { client }
    }

    /// Link or create the identifiers referenced by `entitlements`.
    ///
    /// Runs one list call per identifier-backed classifier that has values.
    /// Identifiers created before a later failure stay created.
    #[instrument(skip(self, entitlements))]
    pub async fn reconcile_identifiers(
        &self,
        entitlements: &EntitlementsMap,
    ) -> Result<IdentifierSyncResult, SyncError> {
        let _timer = metrics::start_sync_timer("identifiers");
        let mut result = IdentifierSyncResult::default();

        for classifier in with_identifiers() {
            let Some(kind) = classifier.identifier else {
                continue;
            };
            let Some(value) = entitlements
                .get(classifier.entitlement)
                .filter(|v| is_truthy(v))
            else {
                continue;
            };

            classifier.validate(value).inspect_err(|e| {
                metrics::record_error(e.kind());
            })?;

            let requested = dedupe(string_items(value).unwrap_or_default());
            if requested.is_empty() {
                continue;
            }

            let ids = self
                .link_identifiers(classifier, kind, &requested, &mut result)
                .await
                .inspect_err(|e| {
                    metrics::record_error(e.kind());
                })?;

            result.relationship_batch.push(UpdateRequestEntry::with_relationship(
                classifier.capability,
                kind.relationship(),
                ids,
            ));
        }

        Ok(result)
    }

    async fn link_identifiers(
        &self,
        classifier: &CapabilityClassifier,
        kind: IdentifierKind,
        requested: &[&str],
        result: &mut IdentifierSyncResult,
    ) -> Result<Vec<String>, SyncError> {
        let existing = self.client.list_identifiers(kind).await?;
        let mut ids = Vec::with_capacity(requested.len());

        for identifier in requested {
            if let Some(found) = existing.iter().find(|e| e.identifier == *identifier) {
                metrics::record_identifier(kind.relationship(), "linked");
                result.linked.push(identifier.to_string());
                ids.push(found.id.clone());
                continue;
            }

            let created = self
                .client
                .create_identifier(kind, identifier)
                .await
                .map_err(|source| SyncError::IdentifierCreation {
                    kind,
                    identifier: identifier.to_string(),
                    entitlement: classifier.entitlement.to_string(),
                    source,
                })?;

            tracing::info!(
                kind = %kind,
                identifier = %identifier,
                id = %created.id,
                "Created identifier"
            );
            metrics::record_identifier(kind.relationship(), "created");
            result.created.push(identifier.to_string());
            result.linked.push(identifier.to_string());
            ids.push(created.id);
        }

        Ok(ids)
    }
}

/// Order-preserving, case-sensitive dedupe.
fn dedupe(items: Vec<&str>) -> Vec<&str> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|item| seen.insert(*item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        assert_eq!(
            dedupe(vec!["group.b", "group.a", "group.b", "Group.a"]),
            vec!["group.b", "group.a", "Group.a"]
        );
        assert!(dedupe(vec![]).is_empty());
    }
}
