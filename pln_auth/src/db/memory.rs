//! In-process storage backend.
//!
//! Implements both repository traits over a pair of maps guarded by an async
//! lock. Semantics match the PostgreSQL schema: usernames and tokens are
//! unique, ids increase monotonically, and expiry is only checked on read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::errors::{StorageError, StorageResult};
use super::repository::{SessionRepository, UserRepository};
use crate::auth::{SessionRecord, UserId, UserRecord};

#[derive(Debug, Clone)]
struct TokenRow {
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<String, UserRecord>,
    tokens: HashMap<String, TokenRow>,
    next_id: UserId,
}

/// Memory-backed credential and session store
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of token rows currently held, expired ones included
    pub async fn token_count(&self) -> usize {
        self.tables.read().await.tokens.len()
    }

    /// Number of token rows owned by `user_id`
    pub async fn tokens_for_user(&self, user_id: UserId) -> usize {
        self.tables
            .read()
            .await
            .tokens
            .values()
            .filter(|row| row.user_id == user_id)
            .count()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> StorageResult<UserId> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(username) {
            return Err(StorageError::Conflict);
        }

        tables.next_id += 1;
        let id = tables.next_id;
        tables.users.insert(
            username.to_string(),
            UserRecord {
                id,
                username: username.to_string(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(id)
    }

    async fn find_by_username(&self, username: &str) -> StorageResult<Option<UserRecord>> {
        Ok(self.tables.read().await.users.get(username).cloned())
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn insert_token(
        &self,
        token: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        if tables.tokens.contains_key(token) {
            return Err(StorageError::Conflict);
        }
        tables.tokens.insert(
            token.to_string(),
            TokenRow {
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn find_active(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> StorageResult<Option<SessionRecord>> {
        let tables = self.tables.read().await;
        let Some(row) = tables.tokens.get(token).filter(|row| row.expires_at > now) else {
            return Ok(None);
        };

        // users are never deleted, so a dangling row is treated as unknown
        Ok(tables
            .users
            .values()
            .find(|user| user.id == row.user_id)
            .map(|user| SessionRecord {
                user_id: user.id,
                username: user.username.clone(),
                expires_at: row.expires_at,
            }))
    }

    async fn delete_token(&self, token: &str) -> StorageResult<bool> {
        Ok(self.tables.write().await.tokens.remove(token).is_some())
    }
}
