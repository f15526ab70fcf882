//! HTTP API for the auth server.
//!
//! # Modules
//!
//! - [`auth`]: register, login, logout and whoami handlers
//! - [`error`]: mapping of auth failures to status codes and JSON bodies
//! - [`request_id`]: request ID propagation, request logging and metrics
//!
//! # Endpoints Overview
//!
//! ```text
//! POST /api/auth/register   - Create an account (201)
//! POST /api/auth/login      - Exchange credentials for a bearer token
//! POST /api/auth/logout     - Revoke the presented bearer token
//! GET  /api/auth/me         - Resolve the presented bearer token
//! GET  /health              - Liveness and storage health
//! ```
//!
//! Unknown paths answer 404 and known paths with the wrong method answer
//! 405, both with the same `{"ok": false, "code", "message"}` body as
//! auth failures.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use pln_server::api::{create_router, AppState};
//! use pln_server::config::StorageBackend;
//! use pln_auth::{AuthManager, db::MemoryStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let state = AppState {
//!     auth_manager: Arc::new(AuthManager::new(store.clone(), store)),
//!     database: None,
//!     storage: StorageBackend::Memory,
//! };
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively. Restrict origins before exposing the
//! server beyond a trusted network.

pub mod auth;
pub mod error;
pub mod request_id;

use crate::config::StorageBackend;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use pln_auth::{AuthManager, db::Database};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; the manager sits behind an `Arc` and the database
/// handle wraps a pooled connection set.
#[derive(Clone)]
pub struct AppState {
    pub auth_manager: Arc<AuthManager>,
    /// Present only with the postgres backend
    pub database: Option<Database>,
    pub storage: StorageBackend,
}

/// Create the API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .method_not_allowed_fallback(error::method_not_allowed);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .method_not_allowed_fallback(error::method_not_allowed)
        .fallback(error::not_found)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when storage is reachable, `503 Service Unavailable`
/// otherwise. The memory backend is always healthy.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","version":"0.1.0","storage":"postgres","database":true,"timestamp":"..."}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = match &state.database {
        Some(db) => match db.health_check().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                false
            }
        },
        None => true,
    };

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "storage": state.storage.to_string(),
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
