//! Metrics collection and exposition.
//!
//! # Metrics
//! - `maintenance_requests_total` (counter): requests through the gate, by
//!   `outcome` (`served`, `blocked`, `bypassed`)
//! - `maintenance_allow_list_errors_total` (counter): failed allow-list reads,
//!   by `kind` (`store`, `malformed`)
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so tests and
//!   library users pay nothing
//! - Corrupt data and unreachable store are counted apart even though the
//!   pipeline treats them the same

use std::net::SocketAddr;

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;

pub const REQUESTS_TOTAL: &str = "maintenance_requests_total";
pub const ALLOW_LIST_ERRORS_TOTAL: &str = "maintenance_allow_list_errors_total";

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_counter!(REQUESTS_TOTAL, "Requests passing the maintenance gate, by outcome");
            describe_counter!(ALLOW_LIST_ERRORS_TOTAL, "Allow-list reads that failed, by kind");
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter");
        }
    }
}

/// Record the gate's decision for one request.
pub fn record_outcome(outcome: &'static str) {
    counter!(REQUESTS_TOTAL, "outcome" => outcome).increment(1);
}

/// Record a failed allow-list read.
pub fn record_allow_list_error(kind: &'static str) {
    counter!(ALLOW_LIST_ERRORS_TOTAL, "kind" => kind).increment(1);
}
