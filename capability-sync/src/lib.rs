//! Capability Sync - Reconciles app entitlements with the capabilities
//! registered for an app identifier on the developer portal.

pub mod classifiers;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use client::{MockPortalClient, PortalClient, PortalError};
pub use config::SyncConfig;
pub use error::SyncError;
pub use services::{
    AccountAccess, CapabilityReconciler, CapabilitySync, IdentifierReconciler, SyncOutcome,
    SyncRequest,
};
