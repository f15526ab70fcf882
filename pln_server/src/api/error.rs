//! Mapping of auth failures onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pln_auth::AuthError;
use serde::Serialize;

/// Failure body: `{"ok": false, "code": ..., "message": ...}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub code: &'static str,
    pub message: String,
}

/// An [`AuthError`] paired with the status it is reported under
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: AuthError,
}

impl ApiError {
    /// Report `error` under an explicit status
    pub fn with_status(status: StatusCode, error: AuthError) -> Self {
        Self { status, error }
    }
}

/// Default status for each error kind
pub fn status_for(error: &AuthError) -> StatusCode {
    match error {
        AuthError::InvalidUsername
        | AuthError::InvalidPassword
        | AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
        AuthError::DuplicateUsername => StatusCode::CONFLICT,
        AuthError::InvalidCredentials
        | AuthError::MissingToken
        | AuthError::InvalidOrExpiredToken => StatusCode::UNAUTHORIZED,
        AuthError::HashingFailed | AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        Self {
            status: status_for(&error),
            error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.error.is_internal() {
            tracing::error!(error = %self.error, "Auth operation failed");
        }

        let body = ErrorResponse {
            ok: false,
            code: self.error.code(),
            message: self.error.client_message(),
        };
        (self.status, Json(body)).into_response()
    }
}

fn routing_failure(status: StatusCode, code: &'static str, message: &str) -> Response {
    let body = ErrorResponse {
        ok: false,
        code,
        message: message.to_string(),
    };
    (status, Json(body)).into_response()
}

/// Fallback for paths that match no route
pub async fn not_found() -> Response {
    routing_failure(StatusCode::NOT_FOUND, "not_found", "Not found")
}

/// Fallback for a known path requested with an unsupported method
pub async fn method_not_allowed() -> Response {
    routing_failure(
        StatusCode::METHOD_NOT_ALLOWED,
        "method_not_allowed",
        "Method not allowed",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pln_auth::db::StorageError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&AuthError::InvalidUsername), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&AuthError::InvalidPassword), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&AuthError::MissingCredentials), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&AuthError::DuplicateUsername), StatusCode::CONFLICT);
        assert_eq!(status_for(&AuthError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(&AuthError::InvalidOrExpiredToken), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_for(&AuthError::Storage(StorageError::Conflict)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_routing_fallbacks_status() {
        assert_eq!(not_found().await.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            method_not_allowed().await.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_with_status_overrides_default() {
        let err = ApiError::with_status(StatusCode::BAD_REQUEST, AuthError::MissingToken);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
