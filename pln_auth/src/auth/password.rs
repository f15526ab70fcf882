//! Password hashing with Argon2id.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
    },
};

use super::errors::{AuthError, AuthResult};

/// Well-formed Argon2id hash at the default cost that no password matches.
/// Logins for unknown usernames are verified against it.
pub const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Salted, adaptive one-way password hasher
///
/// Produces PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so
/// the cost parameters travel with each stored hash.
#[derive(Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        Ok(self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| AuthError::HashingFailed)?
            .to_string())
    }

    /// Verify a password against a stored hash
    ///
    /// Malformed hashes verify as `false`. The digest comparison inside
    /// `argon2` is constant-time.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            log::warn!("Stored password hash is not a valid PHC string");
            return false;
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted() {
        let hasher = PasswordHasher::new();
        let first = hasher.hash("pln12345").unwrap();
        let second = hasher.hash("pln12345").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("pln12345", &first));
        assert!(hasher.verify("pln12345", &second));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("pln12345").unwrap();

        assert!(!hasher.verify("pln12346", &hash));
        assert!(!hasher.verify("", &hash));
    }

    #[test]
    fn test_malformed_hash_is_false() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify("pln12345", "not-a-hash"));
        assert!(!hasher.verify("pln12345", ""));
        assert!(!hasher.verify("pln12345", "$2y$10$legacybcryptstyle"));
    }

    #[test]
    fn test_dummy_hash_matches_default_cost() {
        let parsed = PasswordHash::new(DUMMY_PASSWORD_HASH).unwrap();
        let params = argon2::Params::try_from(&parsed).unwrap();
        let defaults = argon2::Params::default();

        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert_eq!(params.m_cost(), defaults.m_cost());
        assert_eq!(params.t_cost(), defaults.t_cost());
        assert_eq!(params.p_cost(), defaults.p_cost());
        assert!(!PasswordHasher::new().verify("pln12345", DUMMY_PASSWORD_HASH));
    }

    #[test]
    fn test_hash_uses_argon2id() {
        let hash = PasswordHasher::new().hash("pln12345").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }
}
