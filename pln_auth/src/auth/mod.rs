//! Authentication module providing registration, login, and bearer-token
//! sessions.
//!
//! This module implements:
//! - Argon2id password hashing with a random salt per hash
//! - Opaque 256-bit tokens, hex encoded, stored server-side
//! - A fixed 7-day validity window, enforced when a token is read
//! - Idempotent logout by token deletion
//!
//! ## Example
//!
//! ```no_run
//! use pln_auth::auth::{AuthManager, LoginRequest, RegisterRequest};
//! use pln_auth::db::{Database, DatabaseConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::from_env()?).await?;
//!     let auth = AuthManager::new(db.user_repository(), db.session_repository());
//!
//!     auth.register(RegisterRequest {
//!         username: "operator_pln".to_string(),
//!         password: "pln12345".to_string(),
//!     })
//!     .await?;
//!
//!     let session = auth
//!         .login(LoginRequest {
//!             username: "operator_pln".to_string(),
//!             password: "pln12345".to_string(),
//!         })
//!         .await?;
//!
//!     let me = auth.whoami(Some(&session.token)).await?;
//!     println!("Logged in as {}", me.user.username);
//!     Ok(())
//! }
//! ```

mod bearer;
pub mod clock;
pub mod errors;
pub mod manager;
pub mod models;
pub mod password;
pub mod session;
pub mod token;

pub use bearer::parse_bearer;
pub use clock::{Clock, SystemClock};
pub use errors::{AuthError, AuthResult};
pub use manager::AuthManager;
pub use models::{
    IssuedToken, LoginRequest, LoginSession, RegisterRequest, SessionInfo, SessionRecord, User,
    UserId, UserRecord,
};
pub use password::PasswordHasher;
pub use session::SessionValidator;
pub use token::{TOKEN_LENGTH, TOKEN_TTL_DAYS, TokenIssuer};
