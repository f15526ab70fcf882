//! Authentication API handlers.
//!
//! Every response is a JSON envelope with an `ok` flag. Failures carry a
//! stable `code` alongside the human-readable `message`.
//!
//! # Examples
//!
//! Register a new user:
//! ```bash
//! curl -X POST http://localhost:8080/api/auth/register \
//!   -H "Content-Type: application/json" \
//!   -d '{"username": "operator", "password": "pln12345"}'
//! ```
//!
//! Resolve the current user:
//! ```bash
//! curl http://localhost:8080/api/auth/me -H "Authorization: Bearer <token>"
//! ```

use axum::{
    Json,
    body::Bytes,
    extract::{FromRequestParts, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
};
use chrono::{DateTime, Utc};
use pln_auth::auth::{AuthError, LoginRequest, RegisterRequest, User, parse_bearer};
use serde::Serialize;
use std::convert::Infallible;

use super::AppState;
use super::error::ApiError;
use super::request_id::RequestId;
use crate::{logging, metrics};

/// Bearer token taken from the `Authorization` header, if one was presented
#[derive(Debug, Clone, Default)]
pub struct BearerToken(pub Option<String>);

impl BearerToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_bearer)
            .map(str::to_string);
        Ok(BearerToken(token))
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub ok: bool,
    pub message: &'static str,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub ok: bool,
    pub message: &'static str,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub ok: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub ok: bool,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

/// Decode a JSON body leniently: unparsable or absent bodies become empty
/// fields so that validation reports them as missing input.
fn lenient_body<T: serde::de::DeserializeOwned + Default>(body: &Bytes) -> T {
    serde_json::from_slice(body).unwrap_or_default()
}

fn outcome<T>(result: &Result<T, AuthError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.code(),
    }
}

/// Create a user account.
///
/// # Request Body
///
/// ```json
/// { "username": "operator", "password": "pln12345" }
/// ```
///
/// # Response
///
/// `201 Created` with `{"ok": true, "message": ..., "user": {"id": 1, "username": "operator"}}`
///
/// # Errors
///
/// - `400 Bad Request`: username or password fails validation
/// - `409 Conflict`: username already taken
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let request: RegisterRequest = lenient_body(&body);
    let result = state.auth_manager.register(request).await;
    metrics::auth_operations_total("register", outcome(&result));

    let user = result?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            ok: true,
            message: "User registered",
            user,
        }),
    ))
}

/// Exchange credentials for a bearer token.
///
/// # Response
///
/// `200 OK` with `{"ok": true, "token": ..., "expires_at": ..., "user": {...}}`
///
/// # Errors
///
/// - `400 Bad Request`: username or password missing
/// - `401 Unauthorized`: unknown username or wrong password (indistinguishable)
pub async fn login(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Bytes,
) -> Result<Json<LoginResponse>, ApiError> {
    let request: LoginRequest = lenient_body(&body);
    let result = state.auth_manager.login(request).await;
    metrics::auth_operations_total("login", outcome(&result));

    if let Err(AuthError::InvalidCredentials) = &result {
        logging::log_security_event(
            "failed_login",
            request_id.as_str(),
            "Invalid username or password",
        );
    }

    let session = result?;
    Ok(Json(LoginResponse {
        ok: true,
        message: "Logged in",
        token: session.token,
        expires_at: session.expires_at,
        user: session.user,
    }))
}

/// Revoke the presented bearer token.
///
/// Succeeds for unknown or already revoked tokens.
///
/// # Errors
///
/// - `400 Bad Request`: no bearer token supplied
pub async fn logout(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<LogoutResponse>, ApiError> {
    let result = state.auth_manager.logout(token.as_deref()).await;
    metrics::auth_operations_total("logout", outcome(&result));

    match result {
        Ok(()) => Ok(Json(LogoutResponse {
            ok: true,
            message: "Logged out",
        })),
        Err(AuthError::MissingToken) => Err(ApiError::with_status(
            StatusCode::BAD_REQUEST,
            AuthError::MissingToken,
        )),
        Err(e) => Err(e.into()),
    }
}

/// Identify the owner of the presented bearer token.
///
/// # Errors
///
/// - `401 Unauthorized`: token missing, unknown, revoked or expired
pub async fn me(
    State(state): State<AppState>,
    request_id: RequestId,
    token: BearerToken,
) -> Result<Json<MeResponse>, ApiError> {
    let result = state.auth_manager.whoami(token.as_deref()).await;
    metrics::auth_operations_total("whoami", outcome(&result));

    if let Err(AuthError::InvalidOrExpiredToken) = &result {
        logging::log_security_event(
            "invalid_token",
            request_id.as_str(),
            "Rejected unknown or expired bearer token",
        );
    }

    let session = result?;
    Ok(Json(MeResponse {
        ok: true,
        user: session.user,
        expires_at: session.expires_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_body_defaults_on_garbage() {
        let req: LoginRequest = lenient_body(&Bytes::from_static(b"{not json"));
        assert!(req.username.is_empty());
        assert!(req.password.is_empty());

        let req: LoginRequest = lenient_body(&Bytes::new());
        assert!(req.username.is_empty());
    }

    #[test]
    fn test_lenient_body_partial_fields() {
        let req: RegisterRequest = lenient_body(&Bytes::from_static(br#"{"username":"op"}"#));
        assert_eq!(req.username, "op");
        assert!(req.password.is_empty());
    }

    #[test]
    fn test_outcome_labels() {
        let ok: Result<(), AuthError> = Ok(());
        let err: Result<(), AuthError> = Err(AuthError::DuplicateUsername);
        assert_eq!(outcome(&ok), "ok");
        assert_eq!(outcome(&err), "duplicate_username");
    }
}
