//! Bearer-token auth server.
//!
//! Serves register/login/logout/whoami over HTTP, backed by PostgreSQL or
//! by process memory.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Error};
use pico_args::Arguments;
use pln_auth::{
    AuthManager,
    db::{Database, MemoryStore},
};
use pln_server::{
    api,
    config::{CliOverrides, ServerConfig, StorageBackend},
    logging, metrics,
};
use tracing::info;

const HELP: &str = "\
Run the PLN bearer-token auth server

USAGE:
  pln_server [OPTIONS]

OPTIONS:
  --bind          IP:PORT  Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --db-url        URL      Database connection string  [default: env DATABASE_URL]
  --storage       BACKEND  postgres or memory          [default: env STORAGE_BACKEND or postgres]
  --metrics-bind  IP:PORT  Prometheus exporter address [default: env METRICS_BIND, disabled if unset]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  DATABASE_URL             PostgreSQL connection string
  STORAGE_BACKEND          postgres or memory
  METRICS_BIND             Prometheus exporter address
  DB_MAX_CONNECTIONS, DB_MIN_CONNECTIONS, DB_CONNECTION_TIMEOUT,
  DB_IDLE_TIMEOUT, DB_MAX_LIFETIME, DB_QUERY_TIMEOUT
                           Connection pool tuning (timeouts in seconds)
  RUST_LOG                 Log filter (default: info,sqlx=warn,hyper=warn)
";

fn parse_args() -> Result<CliOverrides, Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = CliOverrides {
        bind: pargs.opt_value_from_str::<_, SocketAddr>("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
        storage: pargs
            .opt_value_from_fn("--storage", |s| s.parse::<StorageBackend>())
            .context("Invalid --storage value")?,
        metrics_bind: pargs.opt_value_from_str::<_, SocketAddr>("--metrics-bind")?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("Unexpected arguments: {remaining:?}");
    }

    Ok(overrides)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let overrides = parse_args()?;
    logging::init();

    let config = ServerConfig::from_env(overrides)?;
    config.validate()?;

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics exported at http://{}/metrics", addr);
    }

    let (auth_manager, database) = match config.storage {
        StorageBackend::Postgres => {
            info!("Connecting to database");
            let db = Database::new(&config.database)
                .await
                .context("Failed to connect to database")?;
            db.migrate().await.context("Failed to run migrations")?;
            info!("Database connected and migrated");

            let manager = AuthManager::new(db.user_repository(), db.session_repository());
            (manager, Some(db))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; accounts and tokens are lost on restart");
            let store = Arc::new(MemoryStore::new());
            (AuthManager::new(store.clone(), store), None)
        }
    };

    let api_state = api::AppState {
        auth_manager: Arc::new(auth_manager),
        database: database.clone(),
        storage: config.storage,
    };
    let app = api::create_router(api_state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{} ({} storage). Press Ctrl+C to stop.",
        config.bind, config.storage
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");
    if let Some(db) = database {
        db.close().await;
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::HELP;
    use pln_auth::db::DatabaseConfig;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_help_lists_pool_variables_read_by_config() {
        let vars = [
            ("DB_CONNECTION_TIMEOUT", "11"),
            ("DB_IDLE_TIMEOUT", "12"),
            ("DB_MAX_LIFETIME", "13"),
            ("DB_QUERY_TIMEOUT", "14"),
        ];
        // SAFETY: serialized with the other env-mutating tests
        unsafe {
            for (var, value) in vars {
                std::env::set_var(var, value);
            }
        }

        let config = DatabaseConfig::from_env().unwrap();

        unsafe {
            for (var, _) in vars {
                std::env::remove_var(var);
            }
        }

        assert_eq!(config.connection_timeout_secs, 11);
        assert_eq!(config.idle_timeout_secs, 12);
        assert_eq!(config.max_lifetime_secs, 13);
        assert_eq!(config.query_timeout_secs, 14);
        for (var, _) in vars {
            assert!(HELP.contains(var), "{var} missing from help");
        }
        assert!(!HELP.contains("_SECS"));
    }
}
