//! Database query timeout helpers
//!
//! Every storage round-trip goes through [`with_timeout`] so a stalled
//! database surfaces as [`StorageError::Timeout`] instead of a hung request.

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use super::errors::{StorageError, StorageResult};

/// Default timeout for database queries (5 seconds)
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Execute a query with timeout
///
/// Driver errors are converted through `From<sqlx::Error>`, so unique
/// violations come back as [`StorageError::Conflict`].
///
/// # Example
///
/// ```no_run
/// use pln_auth::db::timeouts::{with_timeout, DEFAULT_QUERY_TIMEOUT};
/// # use sqlx::PgPool;
/// # async fn example(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
///
/// let result = with_timeout(
///     DEFAULT_QUERY_TIMEOUT,
///     sqlx::query("SELECT id FROM users WHERE username = $1")
///         .bind("operator_pln")
///         .fetch_optional(pool)
/// ).await?;
///
/// # Ok(())
/// # }
/// ```
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> StorageResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match timeout(duration, future).await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(e)) => {
            let err = StorageError::from(e);
            if !err.is_conflict() {
                log::warn!("Query failed: {err}");
            }
            Err(err)
        }
        Err(_) => {
            log::warn!("Query timed out after {duration:?}");
            Err(StorageError::Timeout(duration))
        }
    }
}

/// Execute a query with the default timeout (5 seconds)
pub async fn with_default_timeout<F, T>(future: F) -> StorageResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    with_timeout(DEFAULT_QUERY_TIMEOUT, future).await
}
