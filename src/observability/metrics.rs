//! Metrics collection and exposition.
//!
//! # Metrics
//! - `config_admin_remote_calls_total` (counter): by operation, target, outcome
//! - `config_admin_remote_call_duration_seconds` (histogram): by operation, target
//! - `config_admin_cache_invalidations_total` (counter): by cache key

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one call against the remote store or a remote function.
pub fn record_remote_call(operation: &'static str, target: &str, success: bool, start: Instant) {
    let outcome = if success { "ok" } else { "error" };
    counter!(
        "config_admin_remote_calls_total",
        "operation" => operation,
        "target" => target.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "config_admin_remote_call_duration_seconds",
        "operation" => operation,
        "target" => target.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_cache_invalidation(key: &'static str) {
    counter!("config_admin_cache_invalidations_total", "key" => key).increment(1);
}
