//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use crate::event::EventKind;

use super::{
    DISPATCH_FAILURES_TOTAL, GATEWAY_EVENTS_TOTAL, PUSH_MESSAGES_TOTAL,
    REGISTRY_OPERATIONS_TOTAL, REGISTRY_OPERATION_LATENCY,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    exposition_text(buffer)
}

fn exposition_text(buffer: Vec<u8>) -> Result<String, prometheus::Error> {
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Helper struct for recording gateway event metrics
pub struct EventMetrics;

impl EventMetrics {
    pub fn record(kind: EventKind) {
        GATEWAY_EVENTS_TOTAL.with_label_values(&[kind.label()]).inc();
    }

    /// Record an event with an unrecognized or missing type
    pub fn record_ignored() {
        GATEWAY_EVENTS_TOTAL.with_label_values(&["ignored"]).inc();
    }

    pub fn record_failure(code: &str) {
        DISPATCH_FAILURES_TOTAL.with_label_values(&[code]).inc();
    }
}

/// Helper struct for recording registry metrics
pub struct RegistryMetrics;

impl RegistryMetrics {
    pub fn observe(operation: &str, elapsed: Duration, success: bool) {
        let result = if success { "success" } else { "error" };
        REGISTRY_OPERATIONS_TOTAL
            .with_label_values(&[operation, result])
            .inc();
        REGISTRY_OPERATION_LATENCY
            .with_label_values(&[operation])
            .observe(elapsed.as_secs_f64());
    }
}

/// Helper struct for recording push metrics
pub struct PushMetrics;

impl PushMetrics {
    pub fn record_success() {
        PUSH_MESSAGES_TOTAL.with_label_values(&["success"]).inc();
    }

    /// The target connection no longer exists on the gateway
    pub fn record_gone() {
        PUSH_MESSAGES_TOTAL.with_label_values(&["gone"]).inc();
    }

    pub fn record_error() {
        PUSH_MESSAGES_TOTAL.with_label_values(&["error"]).inc();
    }
}
