//! Outbound portal client abstraction.
//!
//! The reconcilers only talk to the developer portal through [`PortalClient`],
//! so the transport (REST, session cookies, API keys) stays with the caller.

pub mod mock;

use crate::models::{AppIdentifierRef, CapabilityIdentifier, IdentifierKind, UpdateRequestEntry};
use async_trait::async_trait;
use thiserror::Error;

pub use mock::MockPortalClient;

/// Error type for portal operations.
#[derive(Debug, Clone, Error)]
pub enum PortalError {
    #[error("Portal not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

#[async_trait]
pub trait PortalClient: Send + Sync {
    /// All identifiers of `kind` registered to the owning account/team.
    async fn list_identifiers(
        &self,
        kind: IdentifierKind,
    ) -> Result<Vec<CapabilityIdentifier>, PortalError>;

    /// Register a new identifier of `kind`.
    async fn create_identifier(
        &self,
        kind: IdentifierKind,
        identifier: &str,
    ) -> Result<CapabilityIdentifier, PortalError>;

    /// Submit one batched capability update for `app`.
    async fn apply_capability_updates(
        &self,
        app: &AppIdentifierRef,
        updates: &[UpdateRequestEntry],
    ) -> Result<(), PortalError>;
}
