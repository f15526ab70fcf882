//! Database configuration module.
//!
//! Provides configuration structures for database connection management.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,

    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,

    /// Upper bound on a single query round-trip in seconds
    pub query_timeout_secs: u64,
}

/// Error raised when an environment variable cannot be parsed
#[derive(Debug, Error)]
#[error("Invalid value for {var}: {value:?}")]
pub struct EnvParseError {
    pub var: String,
    pub value: String,
}

impl DatabaseConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `DATABASE_URL`: PostgreSQL connection string (default: development URL)
    /// - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 20)
    /// - `DB_MIN_CONNECTIONS`: Minimum pool size (default: 2)
    /// - `DB_CONNECTION_TIMEOUT`: Connection timeout in seconds (default: 10)
    /// - `DB_IDLE_TIMEOUT`: Idle timeout in seconds (default: 600)
    /// - `DB_MAX_LIFETIME`: Max lifetime in seconds (default: 1800)
    /// - `DB_QUERY_TIMEOUT`: Per-query timeout in seconds (default: 5)
    ///
    /// # Errors
    ///
    /// Returns [`EnvParseError`] if a variable is set but not a valid number
    pub fn from_env() -> Result<Self, EnvParseError> {
        let defaults = Self::development();

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: parse_env("DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: parse_env("DB_MIN_CONNECTIONS", defaults.min_connections)?,
            connection_timeout_secs: parse_env(
                "DB_CONNECTION_TIMEOUT",
                defaults.connection_timeout_secs,
            )?,
            idle_timeout_secs: parse_env("DB_IDLE_TIMEOUT", defaults.idle_timeout_secs)?,
            max_lifetime_secs: parse_env("DB_MAX_LIFETIME", defaults.max_lifetime_secs)?,
            query_timeout_secs: parse_env("DB_QUERY_TIMEOUT", defaults.query_timeout_secs)?,
        })
    }

    /// Create a default configuration for development
    ///
    /// Uses `postgres://postgres@localhost/pln_auth` as the database URL
    pub fn development() -> Self {
        Self {
            database_url: "postgres://postgres@localhost/pln_auth".to_string(),
            max_connections: 20,
            min_connections: 2,
            connection_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
            query_timeout_secs: 5,
        }
    }

    /// Per-query timeout as a [`Duration`]
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::development()
    }
}

fn parse_env<T: FromStr>(var: &str, default: T) -> Result<T, EnvParseError> {
    match env::var(var) {
        Ok(value) => value.trim().parse().map_err(|_| EnvParseError {
            var: var.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}
