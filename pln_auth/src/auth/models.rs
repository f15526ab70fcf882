//! Authentication data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User ID type
pub type UserId = i64;

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

/// Stored user row, including the password hash
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
}

impl UserRecord {
    /// Strip the hash for outward use
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// A live session resolved from a token, joined with its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub user_id: UserId,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// User registration request
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// User login request
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Freshly minted bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Successful login result
#[derive(Debug, Clone, Serialize)]
pub struct LoginSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Result of resolving a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

impl From<SessionRecord> for SessionInfo {
    fn from(record: SessionRecord) -> Self {
        Self {
            user: User {
                id: record.user_id,
                username: record.username,
            },
            expires_at: record.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_debug_hides_hash() {
        let record = UserRecord {
            id: 1,
            username: "operator_pln".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
        };
        let debug = format!("{record:?}");
        assert!(debug.contains("operator_pln"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_login_request_debug_hides_password() {
        let request = LoginRequest {
            username: "operator_pln".to_string(),
            password: "pln12345".to_string(),
        };
        assert!(!format!("{request:?}").contains("pln12345"));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let request: LoginRequest = serde_json::from_str(r#"{"username":"a"}"#).unwrap();
        assert_eq!(request.username, "a");
        assert!(request.password.is_empty());
    }

    #[test]
    fn test_session_info_from_record() {
        let expires_at = Utc::now();
        let info = SessionInfo::from(SessionRecord {
            user_id: 9,
            username: "op".to_string(),
            expires_at,
        });
        assert_eq!(info.user.id, 9);
        assert_eq!(info.user.username, "op");
        assert_eq!(info.expires_at, expires_at);
    }
}
