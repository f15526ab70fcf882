//! PostgreSQL-backed repository tests.
//!
//! Ignored by default. Run with a disposable database:
//!
//! ```text
//! DATABASE_URL=postgres://postgres@localhost/pln_auth_test cargo test -- --ignored
//! ```

use chrono::{Duration, Utc};
use pln_auth::auth::{AuthError, AuthManager, LoginRequest, RegisterRequest};
use pln_auth::db::{Database, DatabaseConfig, SessionRepository, UserRepository};

/// Helper to create a migrated test database
async fn setup_test_db() -> Database {
    let config = DatabaseConfig {
        max_connections: 5,
        min_connections: 1,
        connection_timeout_secs: 5,
        ..DatabaseConfig::from_env().expect("valid DB_* environment")
    };

    let db = Database::new(&config)
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Failed to run migrations");
    db
}

/// Generate unique username for tests
fn unique_username(prefix: &str) -> String {
    let rand_id: u32 = rand::random();
    format!("{}_{}", prefix, rand_id % 1_000_000)
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_pg_unique_username_is_conflict() {
    let db = setup_test_db().await;
    let users = db.user_repository();
    let username = unique_username("pg_dup");

    users.create_user(&username, "hash").await.unwrap();
    let err = users.create_user(&username, "hash").await.unwrap_err();

    assert!(err.is_conflict());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_pg_find_active_filters_expired() {
    let db = setup_test_db().await;
    let users = db.user_repository();
    let sessions = db.session_repository();
    let username = unique_username("pg_exp");

    let user_id = users.create_user(&username, "hash").await.unwrap();
    let token = format!("expired-{username}");
    let expires_at = Utc::now() - Duration::minutes(1);
    sessions.insert_token(&token, user_id, expires_at).await.unwrap();

    assert!(sessions.find_active(&token, Utc::now()).await.unwrap().is_none());
    assert!(sessions.delete_token(&token).await.unwrap());
    assert!(!sessions.delete_token(&token).await.unwrap());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_pg_full_flow() {
    let db = setup_test_db().await;
    let auth = AuthManager::new(db.user_repository(), db.session_repository());
    let username = unique_username("pg_flow");

    auth.register(RegisterRequest {
        username: username.clone(),
        password: "pln12345".to_string(),
    })
    .await
    .expect("Registration should succeed");

    let session = auth
        .login(LoginRequest {
            username: username.clone(),
            password: "pln12345".to_string(),
        })
        .await
        .expect("Login should succeed");

    let me = auth.whoami(Some(&session.token)).await.unwrap();
    assert_eq!(me.user.username, username);

    auth.logout(Some(&session.token)).await.unwrap();
    assert!(matches!(
        auth.whoami(Some(&session.token)).await,
        Err(AuthError::InvalidOrExpiredToken)
    ));
}
