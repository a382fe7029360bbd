//! Prometheus metrics for the connection service.
//!
//! - Gateway event metrics (events by kind, ignored events, failures)
//! - Registry metrics (operations by result, operation latency)
//! - Push metrics (management API outcomes)

mod helpers;

pub use helpers::{encode_metrics, EventMetrics, PushMetrics, RegistryMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "wsconn";

lazy_static! {
    /// Gateway events received, by kind (`ignored` for unrecognized types)
    pub static ref GATEWAY_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_gateway_events_total", METRIC_PREFIX),
        "Total gateway events received",
        &["kind"]
    ).unwrap();

    /// Events whose action failed, by error code
    pub static ref DISPATCH_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_dispatch_failures_total", METRIC_PREFIX),
        "Total gateway events whose action failed",
        &["error"]
    ).unwrap();

    /// Registry operations by operation and result
    pub static ref REGISTRY_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_registry_operations_total", METRIC_PREFIX),
        "Total connection registry operations",
        &["operation", "result"]
    ).unwrap();

    /// Registry operation latency
    pub static ref REGISTRY_OPERATION_LATENCY: HistogramVec = register_histogram_vec!(
        format!("{}_registry_operation_latency_seconds", METRIC_PREFIX),
        "Connection registry operation latency in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    ).unwrap();

    /// Messages pushed through the management API, by result
    pub static ref PUSH_MESSAGES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_push_messages_total", METRIC_PREFIX),
        "Total messages pushed to connections",
        &["result"]
    ).unwrap();
}
