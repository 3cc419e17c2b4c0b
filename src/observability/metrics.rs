//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_submissions_total` (counter): submissions by terminal outcome
//! - `relay_rate_limited_total` (counter): rejected admissions
//! - `relay_upstream_duration_seconds` (histogram): upstream call latency
//! - `relay_rate_limit_clients` (gauge): client identifiers held in memory
//!
//! Recording is a no-op until a recorder is installed, so handlers and
//! tests never need to care whether the exporter is running.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_submission(outcome: &'static str) {
    metrics::counter!("relay_submissions_total", "outcome" => outcome).increment(1);
}

pub fn record_rate_limited() {
    metrics::counter!("relay_rate_limited_total").increment(1);
}

pub fn record_upstream_call(status: u16, start: Instant) {
    metrics::histogram!("relay_upstream_duration_seconds", "status" => status.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_tracked_clients(count: usize) {
    metrics::gauge!("relay_rate_limit_clients").set(count as f64);
}
