//! Authentication manager implementation.

use std::sync::Arc;

use super::{
    clock::{Clock, SystemClock},
    errors::{AuthError, AuthResult},
    models::{LoginRequest, LoginSession, RegisterRequest, SessionInfo, User},
    password::{DUMMY_PASSWORD_HASH, PasswordHasher},
    session::SessionValidator,
    token::TokenIssuer,
};
use crate::db::{SessionRepository, StorageError, UserRepository};

/// Minimum username length
pub const USERNAME_MIN_LEN: usize = 3;
/// Maximum username length
pub const USERNAME_MAX_LEN: usize = 30;
/// Minimum password length in bytes
pub const PASSWORD_MIN_LEN: usize = 6;
/// Maximum password length in bytes
pub const PASSWORD_MAX_LEN: usize = 72;

/// Authentication manager
///
/// Stateless across calls: every operation is an independent sequence of
/// round-trips to the repositories.
#[derive(Clone)]
pub struct AuthManager {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    validator: SessionValidator,
}

impl AuthManager {
    /// Create a new authentication manager using the system clock
    pub fn new(users: Arc<dyn UserRepository>, sessions: Arc<dyn SessionRepository>) -> Self {
        Self::with_clock(users, sessions, Arc::new(SystemClock))
    }

    /// Create a new authentication manager with an explicit time source
    pub fn with_clock(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher: PasswordHasher::new(),
            issuer: TokenIssuer::new(sessions.clone(), clock.clone()),
            validator: SessionValidator::new(sessions, clock),
        }
    }

    /// Register a new user
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidUsername` - username does not match `^[A-Za-z0-9_.]{3,30}$`
    /// * `AuthError::InvalidPassword` - password not 6-72 bytes
    /// * `AuthError::DuplicateUsername` - username already exists, including
    ///   when a concurrent registration wins the insert
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<User> {
        let username = request.username.trim();

        validate_username(username)?;
        validate_password(&request.password)?;

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AuthError::DuplicateUsername);
        }

        let password_hash = self.hash_password(request.password).await?;

        let id = match self.users.create_user(username, &password_hash).await {
            Ok(id) => id,
            Err(StorageError::Conflict) => {
                log::info!("Registration for {username} lost a concurrent insert race");
                return Err(AuthError::DuplicateUsername);
            }
            Err(e) => return Err(e.into()),
        };

        log::info!("Registered user {username} (id {id})");

        Ok(User {
            id,
            username: username.to_string(),
        })
    }

    /// Login a user and issue a bearer token
    ///
    /// Only non-emptiness is checked here; a malformed username simply has no
    /// stored match.
    ///
    /// # Errors
    ///
    /// * `AuthError::MissingCredentials` - username or password empty
    /// * `AuthError::InvalidCredentials` - unknown user or wrong password
    /// * `AuthError::Storage` - token could not be persisted
    pub async fn login(&self, request: LoginRequest) -> AuthResult<LoginSession> {
        let username = request.username.trim();
        if username.is_empty() || request.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let Some(record) = self.users.find_by_username(username).await? else {
            self.verify_password(request.password, DUMMY_PASSWORD_HASH.to_string())
                .await?;
            log::info!("Failed login for unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .verify_password(request.password, record.password_hash.clone())
            .await?
        {
            log::info!("Failed login for user id {}", record.id);
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.issuer.issue(record.id).await?;
        log::info!("User id {} logged in", record.id);

        Ok(LoginSession {
            token: issued.token,
            expires_at: issued.expires_at,
            user: record.to_user(),
        })
    }

    /// Logout by revoking the presented token
    ///
    /// Succeeds whether or not the token existed.
    ///
    /// # Errors
    ///
    /// * `AuthError::MissingToken` - no token supplied
    pub async fn logout(&self, token: Option<&str>) -> AuthResult<()> {
        let token = require_token(token)?;
        self.validator.revoke(token).await?;
        log::info!("Token revoked");
        Ok(())
    }

    /// Resolve the presented token to its user
    ///
    /// # Errors
    ///
    /// * `AuthError::MissingToken` - no token supplied
    /// * `AuthError::InvalidOrExpiredToken` - unknown, revoked or expired token
    pub async fn whoami(&self, token: Option<&str>) -> AuthResult<SessionInfo> {
        let token = require_token(token)?;
        self.validator.resolve(token).await
    }

    async fn hash_password(&self, password: String) -> AuthResult<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|_| AuthError::HashingFailed)?
    }

    async fn verify_password(&self, password: String, hash: String) -> AuthResult<bool> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|_| AuthError::HashingFailed)
    }
}

fn require_token(token: Option<&str>) -> AuthResult<&str> {
    token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)
}

/// Validate username format: 3-30 of `[A-Za-z0-9_.]`
pub fn validate_username(username: &str) -> AuthResult<()> {
    let len = username.len();
    let charset_ok = username
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.');

    if !charset_ok || !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(AuthError::InvalidUsername);
    }
    Ok(())
}

/// Validate password length in bytes
pub fn validate_password(password: &str) -> AuthResult<()> {
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&password.len()) {
        return Err(AuthError::InvalidPassword);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_bounds() {
        assert!(validate_username("abc").is_ok());
        assert!(validate_username(&"a".repeat(30)).is_ok());
        assert!(matches!(validate_username("op"), Err(AuthError::InvalidUsername)));
        assert!(validate_username(&"a".repeat(31)).is_err());
    }

    #[test]
    fn test_validate_username_charset() {
        assert!(validate_username("operator_pln").is_ok());
        assert!(validate_username("op.erator.01").is_ok());
        assert!(validate_username("op-erator").is_err());
        assert!(validate_username("op erator").is_err());
        assert!(validate_username("opérateur").is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn test_validate_password_bounds() {
        assert!(validate_password("123456").is_ok());
        assert!(validate_password(&"x".repeat(72)).is_ok());
        assert!(matches!(validate_password("12345"), Err(AuthError::InvalidPassword)));
        assert!(validate_password(&"x".repeat(73)).is_err());
    }

    #[test]
    fn test_require_token() {
        assert_eq!(require_token(Some("abc")).unwrap(), "abc");
        assert!(matches!(require_token(None), Err(AuthError::MissingToken)));
        assert!(matches!(require_token(Some("  ")), Err(AuthError::MissingToken)));
    }
}
