//! Repository trait definitions for testability and dependency injection.
//!
//! The auth core only talks to storage through [`UserRepository`] and
//! [`SessionRepository`]. PostgreSQL implementations live here; the
//! in-process implementation lives in [`super::memory`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use std::time::Duration;

use super::errors::StorageResult;
use super::timeouts::{with_timeout, DEFAULT_QUERY_TIMEOUT};
use crate::auth::{SessionRecord, UserId, UserRecord};

/// Trait for credential store operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user, returning its id
    ///
    /// Fails with `StorageError::Conflict` if the username already exists.
    async fn create_user(&self, username: &str, password_hash: &str) -> StorageResult<UserId>;

    /// Find user by exact username
    async fn find_by_username(&self, username: &str) -> StorageResult<Option<UserRecord>>;
}

/// Trait for session token operations
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a token for a user
    ///
    /// Fails with `StorageError::Conflict` if the token value already exists.
    async fn insert_token(
        &self,
        token: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> StorageResult<()>;

    /// Look up a token that is still valid at `now`, joined with its owner
    async fn find_active(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> StorageResult<Option<SessionRecord>>;

    /// Delete a token; returns whether a row was removed
    async fn delete_token(&self, token: &str) -> StorageResult<bool>;
}

/// PostgreSQL implementation of `UserRepository`
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, username: &str, password_hash: &str) -> StorageResult<UserId> {
        let row = with_timeout(
            self.query_timeout,
            sqlx::query(
                "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING id",
            )
            .bind(username)
            .bind(password_hash)
            .fetch_one(&self.pool),
        )
        .await?;

        Ok(row.try_get("id")?)
    }

    async fn find_by_username(&self, username: &str) -> StorageResult<Option<UserRecord>> {
        let row = with_timeout(
            self.query_timeout,
            sqlx::query("SELECT id, username, password_hash FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool),
        )
        .await?;

        row.map(|r| -> StorageResult<UserRecord> {
            Ok(UserRecord {
                id: r.try_get("id")?,
                username: r.try_get("username")?,
                password_hash: r.try_get("password_hash")?,
            })
        })
        .transpose()
    }
}

/// PostgreSQL implementation of `SessionRepository`
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn insert_token(
        &self,
        token: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> StorageResult<()> {
        with_timeout(
            self.query_timeout,
            sqlx::query(
                "INSERT INTO session_tokens (token, user_id, expires_at) VALUES ($1, $2, $3)",
            )
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn find_active(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> StorageResult<Option<SessionRecord>> {
        let row = with_timeout(
            self.query_timeout,
            sqlx::query(
                r#"
                SELECT u.id, u.username, t.expires_at
                FROM session_tokens t
                JOIN users u ON u.id = t.user_id
                WHERE t.token = $1 AND t.expires_at > $2
                LIMIT 1
                "#,
            )
            .bind(token)
            .bind(now)
            .fetch_optional(&self.pool),
        )
        .await?;

        row.map(|r| -> StorageResult<SessionRecord> {
            Ok(SessionRecord {
                user_id: r.try_get("id")?,
                username: r.try_get("username")?,
                expires_at: r.try_get("expires_at")?,
            })
        })
        .transpose()
    }

    async fn delete_token(&self, token: &str) -> StorageResult<bool> {
        let result = with_timeout(
            self.query_timeout,
            sqlx::query("DELETE FROM session_tokens WHERE token = $1")
                .bind(token)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
