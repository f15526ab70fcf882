//! Structured logging configuration.
//!
//! Installs a `tracing` subscriber that also receives `log` records emitted
//! by the `pln_auth` library, and provides helpers for security and request
//! events.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var; the default is
/// `info,sqlx=warn,hyper=warn`.
///
/// # Example
///
/// ```no_run
/// use pln_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log security event with structured data
///
/// # Example
///
/// ```
/// use pln_server::logging::log_security_event;
///
/// log_security_event(
///     "failed_login",
///     "5f0c3c0e-8a2b-4f0e-9d55-3c1f7b0e2a11",
///     "Invalid username or password",
/// );
/// ```
pub fn log_security_event(event_type: &str, request_id: &str, message: &str) {
    tracing::warn!(
        event_type = event_type,
        request_id = request_id,
        "SECURITY: {}",
        message
    );
}

/// Log API request/response
pub fn log_api_request(
    request_id: &str,
    method: &str,
    path: &str,
    status_code: u16,
    duration_ms: u64,
) {
    tracing::info!(
        request_id = request_id,
        http_method = method,
        http_path = path,
        http_status = status_code,
        duration_ms = duration_ms,
        "API request completed"
    );
}
