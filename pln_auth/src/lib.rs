//! # PLN Auth
//!
//! Username/password authentication issuing opaque bearer tokens.
//!
//! The crate is split into two layers:
//!
//! - [`auth`]: the [`AuthManager`] facade (register, login, logout, whoami)
//!   and the components it orchestrates: password hasher, token issuer,
//!   session validator.
//! - [`db`]: the persistence interface ([`db::UserRepository`],
//!   [`db::SessionRepository`]) with PostgreSQL and in-memory backends.
//!
//! The core never reads transport state: callers pass the bearer token in
//! explicitly and receive a tagged [`AuthResult`].

pub mod auth;
pub mod db;

pub use auth::{AuthError, AuthManager, AuthResult};
