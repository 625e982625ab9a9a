//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_active_connections` (gauge): currently forwarded connections
//! - `gate_admissions_total` (counter): connections admitted by the gate
//! - `gate_rejections_total` (counter): connections turned away with 429
//! - `gate_upstream_errors_total` (counter): failed or broken upstream streams
//! - `http_requests_total` (counter): responses by route and status
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_gate_admission(active: usize) {
    ::metrics::counter!("gate_admissions_total").increment(1);
    ::metrics::gauge!("gate_active_connections").set(active as f64);
}

pub fn record_gate_release(active: usize) {
    ::metrics::gauge!("gate_active_connections").set(active as f64);
}

pub fn record_gate_rejection() {
    ::metrics::counter!("gate_rejections_total").increment(1);
}

pub fn record_upstream_error() {
    ::metrics::counter!("gate_upstream_errors_total").increment(1);
}

pub fn record_request(route: &'static str, status: u16) {
    ::metrics::counter!(
        "http_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
}
