//! Services module for capability-sync.

pub mod capabilities;
pub mod identifiers;
pub mod metrics;
pub mod resolvers;
pub mod sync;

pub use capabilities::{augment_update_error, plan, CapabilityReconciler};
pub use identifiers::IdentifierReconciler;
pub use metrics::{get_metrics, init_metrics};
pub use resolvers::resolve_sync_operation;
pub use sync::{
    merge_relationships, AccountAccess, CapabilitySync, SkipReason, SyncOutcome, SyncRequest,
};
