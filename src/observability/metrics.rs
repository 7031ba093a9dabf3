//! Metrics collection and exposition.
//!
//! # Metrics
//! - `postback_requests_total` (counter): captured postbacks by payload kind
//! - `postback_payload_fallbacks_total` (counter): structured parses that fell back to text
//! - `postback_persisted_lines_total` (counter): lines appended to the daily log
//! - `postback_persist_failures_total` (counter): envelopes that could not be written
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus exporter.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the global recorder and serve `/metrics` on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_postback(payload_kind: &'static str) {
    metrics::counter!("postback_requests_total", "payload" => payload_kind).increment(1);
}

pub fn record_payload_fallback() {
    metrics::counter!("postback_payload_fallbacks_total").increment(1);
}

pub fn record_persisted() {
    metrics::counter!("postback_persisted_lines_total").increment(1);
}

pub fn record_persist_failure() {
    metrics::counter!("postback_persist_failures_total").increment(1);
}
