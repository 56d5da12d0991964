//! Router counters
//!
//! Thin wrappers over the `metrics` macros so metric names and labels live
//! in one place. Without an installed recorder every call is a no-op.

use metrics::{counter, histogram};

/// One batch handed to the router
pub fn record_batch(messages: usize) {
    counter!("log_router_batches_total").increment(1);
    counter!("log_router_messages_total").increment(messages as u64);
}

/// Resolution degraded to the default sink
pub fn record_resolution_fallback(reason: &'static str) {
    counter!("log_router_resolution_fallbacks_total", "reason" => reason).increment(1);
}

/// Delivery attempt outcome, labelled by sink kind (`queue` / `object_store`)
pub fn record_delivery(sink_kind: &'static str, success: bool) {
    if success {
        counter!("log_router_messages_delivered_total", "sink_kind" => sink_kind).increment(1);
    } else {
        counter!("log_router_delivery_failures_total", "sink_kind" => sink_kind).increment(1);
    }
}

/// Inbound deletion outcome
pub fn record_delete(success: bool) {
    if success {
        counter!("log_router_messages_deleted_total").increment(1);
    } else {
        counter!("log_router_delete_failures_total").increment(1);
    }
}

/// Size of one written columnar object
pub fn record_object_bytes(bytes: usize) {
    histogram!("log_router_object_bytes").record(bytes as f64);
}
