//! Opaque bearer token issuance.

use chrono::Duration;
use rand::RngCore;
use std::sync::Arc;

use super::{
    clock::Clock,
    errors::{AuthError, AuthResult},
    models::{IssuedToken, UserId},
};
use crate::db::{SessionRepository, StorageError};

/// Random bytes per token (256 bits)
pub const TOKEN_BYTES: usize = 32;

/// Length of the hex-encoded token string
pub const TOKEN_LENGTH: usize = TOKEN_BYTES * 2;

/// Validity window of every issued token
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Fresh tokens tried before a collision is reported as a storage failure
const MAX_ISSUE_ATTEMPTS: usize = 3;

/// Generate a random hex token from the thread-local CSPRNG
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Mints tokens and persists them with their owner and absolute expiry
#[derive(Clone)]
pub struct TokenIssuer {
    sessions: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(sessions: Arc<dyn SessionRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions,
            clock,
            ttl: Duration::days(TOKEN_TTL_DAYS),
        }
    }

    /// Issue a token for `user_id`, valid for seven days from now
    ///
    /// # Errors
    ///
    /// * `AuthError::Storage` - the token row could not be persisted; no
    ///   token is returned in that case
    pub async fn issue(&self, user_id: UserId) -> AuthResult<IssuedToken> {
        let expires_at = self.clock.now() + self.ttl;

        for _ in 0..MAX_ISSUE_ATTEMPTS {
            let token = generate_token();
            match self.sessions.insert_token(&token, user_id, expires_at).await {
                Ok(()) => return Ok(IssuedToken { token, expires_at }),
                Err(StorageError::Conflict) => {
                    log::warn!("Token collision for user {user_id}, regenerating");
                }
                Err(e) => return Err(AuthError::Storage(e)),
            }
        }

        Err(AuthError::Storage(StorageError::Conflict))
    }
}
