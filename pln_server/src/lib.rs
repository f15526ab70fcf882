//! HTTP front for the PLN auth backend.
//!
//! Wires [`pln_auth::AuthManager`] to an axum router, with configuration
//! from the environment and command line, structured logging and
//! Prometheus metrics.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
