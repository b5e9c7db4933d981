//! Error types for capability-sync.

use crate::client::PortalError;
use crate::models::IdentifierKind;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// An entitlement value does not have the shape its capability expects.
    #[error("Entitlement \"{key}\" has invalid value {value}")]
    InvalidEntitlement {
        key: String,
        value: serde_json::Value,
    },

    #[error(
        "{source}\n\nRemove the value '{identifier}' from the array '{entitlement}' in your entitlements. \
         If you know that this {kind} is registered to one of your apps, try again with a different account."
    )]
    IdentifierCreation {
        kind: IdentifierKind,
        identifier: String,
        entitlement: String,
        #[source]
        source: PortalError,
    },

    #[error(
        "{source}\n\nUnable to update capabilities for app identifier \"{app_identifier}\". \
         You can remove capabilities manually at {edit_url}"
    )]
    UpdateRejected {
        app_identifier: String,
        edit_url: String,
        #[source]
        source: PortalError,
    },

    #[error(transparent)]
    Portal(#[from] PortalError),
}

impl SyncError {
    pub fn invalid_entitlement(key: &str, value: &serde_json::Value) -> Self {
        Self::InvalidEntitlement {
            key: key.to_string(),
            value: value.clone(),
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEntitlement { .. } => "invalid_entitlement",
            Self::IdentifierCreation { .. } => "identifier_creation",
            Self::UpdateRejected { .. } => "update_rejected",
            Self::Portal(_) => "portal",
        }
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::InvalidEntitlement { .. } => {
                AppError::ValidationError(anyhow::Error::new(err))
            }
            other => AppError::BadGateway(other.to_string()),
        }
    }
}
