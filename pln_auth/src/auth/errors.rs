//! Authentication error types.

use thiserror::Error;

use crate::db::StorageError;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username does not match the allowed pattern
    #[error("Invalid username (3-30 characters: letters, digits, underscore, dot)")]
    InvalidUsername,

    /// Password length out of range
    #[error("Password must be 6-72 characters")]
    InvalidPassword,

    /// Username already exists
    #[error("Username is already registered")]
    DuplicateUsername,

    /// Login submitted with an empty field
    #[error("Username and password are required")]
    MissingCredentials,

    /// Unknown user or wrong password; deliberately indistinguishable
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No bearer token supplied
    #[error("Missing bearer token")]
    MissingToken,

    /// Token unknown, revoked or expired
    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    /// Password hashing failed
    #[error("Password hashing failed")]
    HashingFailed,

    /// Persistence failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidUsername => "invalid_username",
            AuthError::InvalidPassword => "invalid_password",
            AuthError::DuplicateUsername => "duplicate_username",
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidOrExpiredToken => "invalid_or_expired_token",
            AuthError::HashingFailed | AuthError::Storage(_) => "internal_error",
        }
    }

    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Storage and hashing errors collapse to a generic message.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::HashingFailed | AuthError::Storage(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Whether the failure is on the server side rather than the caller's
    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::HashingFailed | AuthError::Storage(_))
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
