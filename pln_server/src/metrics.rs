//! Prometheus metrics for the auth server.
//!
//! Counters are always recorded; they are only exported when
//! [`init_metrics`] has installed the Prometheus recorder. Without a
//! recorder the macros are no-ops.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter with a scrape listener on `addr`.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

/// Record HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

/// Record the outcome of an auth operation (`register`, `login`, ...).
///
/// `outcome` is `"ok"` or the error code.
pub fn auth_operations_total(operation: &'static str, outcome: &'static str) {
    metrics::counter!("auth_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
