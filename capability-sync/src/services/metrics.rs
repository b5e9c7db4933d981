//! Prometheus metrics for capability-sync.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

/// Counter for resolved sync operations by kind (enable, disable).
pub static SYNC_OPERATIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "capability_sync_operations_total",
        "Total number of capability operations placed in an update batch",
        &["operation"]
    )
    .expect("Failed to register SYNC_OPERATIONS")
});

/// Counter for identifier reconciliation outcomes by kind.
pub static IDENTIFIERS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "capability_sync_identifiers_total",
        "Total number of identifiers linked or created",
        &["kind", "outcome"]
    )
    .expect("Failed to register IDENTIFIERS")
});

/// Counter for batched update requests sent to the portal.
pub static APPLY_REQUESTS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "capability_sync_apply_requests_total",
        "Total number of capability update requests",
        &["status"]
    )
    .expect("Failed to register APPLY_REQUESTS")
});

/// Counter for errors.
pub static ERRORS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "capability_sync_errors_total",
        "Total number of capability sync errors",
        &["error_type"]
    )
    .expect("Failed to register ERRORS")
});

/// Histogram for reconciliation pass duration.
pub static SYNC_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "capability_sync_duration_seconds",
        "Capability sync pass duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register SYNC_DURATION")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&SYNC_OPERATIONS);
    Lazy::force(&IDENTIFIERS);
    Lazy::force(&APPLY_REQUESTS);
    Lazy::force(&ERRORS);
    Lazy::force(&SYNC_DURATION);
}

/// Get all metrics as Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

pub fn record_sync_operation(operation: &str) {
    SYNC_OPERATIONS.with_label_values(&[operation]).inc();
}

pub fn record_identifier(kind: &str, outcome: &str) {
    IDENTIFIERS.with_label_values(&[kind, outcome]).inc();
}

pub fn record_apply_request(status: &str) {
    APPLY_REQUESTS.with_label_values(&[status]).inc();
}

/// Record an error.
pub fn record_error(error_type: &str) {
    ERRORS.with_label_values(&[error_type]).inc();
}

/// Start a duration timer for a sync pass. Observed when dropped.
pub fn start_sync_timer(operation: &str) -> prometheus::HistogramTimer {
    SYNC_DURATION.with_label_values(&[operation]).start_timer()
}
