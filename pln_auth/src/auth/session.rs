//! Bearer token resolution and revocation.

use std::sync::Arc;

use super::{
    clock::Clock,
    errors::{AuthError, AuthResult},
    models::SessionInfo,
};
use crate::db::SessionRepository;

/// Resolves tokens to their owning user
///
/// Expiry is enforced at read time; expired rows are left in place and look
/// exactly like unknown tokens to the caller.
#[derive(Clone)]
pub struct SessionValidator {
    sessions: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
}

impl SessionValidator {
    pub fn new(sessions: Arc<dyn SessionRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { sessions, clock }
    }

    /// Resolve a token to `(user, expires_at)`
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidOrExpiredToken` - token absent, revoked, or `expires_at <= now`
    /// * `AuthError::Storage` - lookup failed
    pub async fn resolve(&self, token: &str) -> AuthResult<SessionInfo> {
        self.sessions
            .find_active(token, self.clock.now())
            .await?
            .map(SessionInfo::from)
            .ok_or(AuthError::InvalidOrExpiredToken)
    }

    /// Delete a token row; absent tokens are not an error
    pub async fn revoke(&self, token: &str) -> AuthResult<()> {
        if !self.sessions.delete_token(token).await? {
            log::debug!("Revoke requested for a token with no stored row");
        }
        Ok(())
    }
}
