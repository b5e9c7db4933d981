//! In-memory portal client for tests and dry runs.

use super::{PortalClient, PortalError};
use crate::classifiers::settings_for_update;
use crate::models::{
    AppIdentifierRef, CapabilityAttributes, CapabilityIdentifier, IdentifierKind,
    RemoteCapability, UpdateRequestEntry,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Mock portal that keeps identifiers and capabilities in memory.
///
/// Applied batches are recorded and also folded into the capability state, so
/// `capabilities()` returns what a follow-up fetch from the portal would.
#[derive(Default)]
pub struct MockPortalClient {
    identifiers: Mutex<HashMap<IdentifierKind, Vec<CapabilityIdentifier>>>,
    capabilities: Mutex<Vec<RemoteCapability>>,
    applied: Mutex<Vec<Vec<UpdateRequestEntry>>>,
    created: Mutex<Vec<String>>,
    create_failures: Mutex<HashMap<String, PortalError>>,
    apply_failure: Mutex<Option<PortalError>>,
    list_count: AtomicU64,
    create_count: AtomicU64,
    apply_count: AtomicU64,
    next_id: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockPortalClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an identifier that already exists on the account.
    pub fn with_identifier(self, kind: IdentifierKind, id: &str, identifier: &str) -> Self {
        lock(&self.identifiers)
            .entry(kind)
            .or_default()
            .push(CapabilityIdentifier {
                id: id.to_string(),
                identifier: identifier.to_string(),
            });
        self
    }

    /// Seed the capabilities registered for the app identifier.
    pub fn with_capabilities(self, capabilities: Vec<RemoteCapability>) -> Self {
        *lock(&self.capabilities) = capabilities;
        self
    }

    /// Make creation of `identifier` fail with `error`.
    pub fn fail_create(self, identifier: &str, error: PortalError) -> Self {
        lock(&self.create_failures).insert(identifier.to_string(), error);
        self
    }

    /// Make every apply call fail with `error`.
    pub fn fail_apply(self, error: PortalError) -> Self {
        *lock(&self.apply_failure) = Some(error);
        self
    }

    pub fn list_count(&self) -> u64 {
        self.list_count.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> u64 {
        self.create_count.load(Ordering::SeqCst)
    }

    pub fn apply_count(&self) -> u64 {
        self.apply_count.load(Ordering::SeqCst)
    }

    pub fn applied_batches(&self) -> Vec<Vec<UpdateRequestEntry>> {
        lock(&self.applied).clone()
    }

    pub fn created_identifiers(&self) -> Vec<String> {
        lock(&self.created).clone()
    }

    pub fn identifiers(&self, kind: IdentifierKind) -> Vec<CapabilityIdentifier> {
        lock(&self.identifiers)
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    pub fn capabilities(&self) -> Vec<RemoteCapability> {
        lock(&self.capabilities).clone()
    }

    fn fold_update(&self, app: &AppIdentifierRef, entry: &UpdateRequestEntry) {
        let mut capabilities = lock(&self.capabilities);
        capabilities.retain(|cap| !cap.is_type(entry.capability_type));

        if entry.is_disable() {
            return;
        }

        let settings = settings_for_update(entry);
        capabilities.push(RemoteCapability {
            id: format!("{}_{}", app.id, entry.capability_type),
            attributes: CapabilityAttributes {
                capability_type: None,
                enabled: settings.as_ref().map(|_| true),
                settings,
            },
        });
    }
}

#[async_trait]
impl PortalClient for MockPortalClient {
    async fn list_identifiers(
        &self,
        kind: IdentifierKind,
    ) -> Result<Vec<CapabilityIdentifier>, PortalError> {
        self.list_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.identifiers(kind))
    }

    async fn create_identifier(
        &self,
        kind: IdentifierKind,
        identifier: &str,
    ) -> Result<CapabilityIdentifier, PortalError> {
        self.create_count.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = lock(&self.create_failures).get(identifier) {
            return Err(error.clone());
        }

        let created = CapabilityIdentifier {
            id: format!("MOCK{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
            identifier: identifier.to_string(),
        };

        lock(&self.identifiers)
            .entry(kind)
            .or_default()
            .push(created.clone());
        lock(&self.created).push(identifier.to_string());

        tracing::info!(
            kind = %kind,
            identifier = %identifier,
            id = %created.id,
            "[MOCK] Identifier created"
        );

        Ok(created)
    }

    async fn apply_capability_updates(
        &self,
        app: &AppIdentifierRef,
        updates: &[UpdateRequestEntry],
    ) -> Result<(), PortalError> {
        self.apply_count.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = lock(&self.apply_failure).as_ref() {
            return Err(error.clone());
        }

        lock(&self.applied).push(updates.to_vec());
        for entry in updates {
            self.fold_update(app, entry);
        }

        Ok(())
    }
}
