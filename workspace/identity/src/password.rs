//! # Secret hashing with Argon2id
//!
//! Passwords and every issued token (remember, activation, reset) are stored
//! as PHC-format Argon2id strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`).
//! Each hash gets a fresh random salt, so hashing the same secret twice never
//! yields the same digest and a digest never equals its plaintext.
//!
//! Verification reads the cost parameters back out of the PHC string, which
//! lets [`use_minimum_cost`] lower the cost for test suites without
//! invalidating digests produced at the default cost.

use crate::error::{IdentityError, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::{distributions::Alphanumeric, Rng};
use std::sync::atomic::{AtomicBool, Ordering};

/// Length of tokens handed out by [`new_token`].
pub const TOKEN_LENGTH: usize = 22;

static MINIMUM_COST: AtomicBool = AtomicBool::new(false);

/// Switches new hashes to the cheapest Argon2 parameters. Meant for tests.
pub fn use_minimum_cost(enabled: bool) {
    MINIMUM_COST.store(enabled, Ordering::Relaxed);
}

fn hasher() -> Result<Argon2<'static>> {
    let params = if MINIMUM_COST.load(Ordering::Relaxed) {
        Params::new(
            Params::MIN_M_COST,
            Params::MIN_T_COST,
            Params::MIN_P_COST,
            None,
        )
        .map_err(|e| IdentityError::Hashing(format!("Failed to create argon2 params: {}", e)))?
    } else {
        Params::default()
    };
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a secret using Argon2id. Returns a PHC-format string.
pub fn hash_secret(secret: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| IdentityError::Hashing(format!("Failed to hash secret: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a secret against a PHC-format hash string.
///
/// `Ok(false)` on mismatch, `Err` only if the stored digest is malformed.
pub fn verify_secret(secret: &str, digest: &str) -> Result<bool> {
    let parsed = PasswordHash::new(digest)
        .map_err(|e| IdentityError::Hashing(format!("Invalid digest: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok())
}

/// A random URL-safe token.
pub fn new_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_not_plaintext_and_verifies() {
        use_minimum_cost(true);
        let digest = hash_secret("foobar").unwrap();

        assert_ne!(digest, "foobar");
        assert!(digest.starts_with("$argon2id$"));
        assert!(verify_secret("foobar", &digest).unwrap());
        assert!(!verify_secret("foobaz", &digest).unwrap());
        assert!(!verify_secret("", &digest).unwrap());
    }

    #[test]
    fn test_same_secret_hashes_differently() {
        use_minimum_cost(true);
        let first = hash_secret("foobar").unwrap();
        let second = hash_secret("foobar").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_default_cost_digest_verifies() {
        let digest = Argon2::default()
            .hash_password(b"foobar", &SaltString::generate(&mut OsRng))
            .unwrap()
            .to_string();
        assert!(verify_secret("foobar", &digest).unwrap());
    }

    #[test]
    fn test_malformed_digest_is_an_error() {
        assert!(matches!(
            verify_secret("foobar", "not a digest"),
            Err(IdentityError::Hashing(_))
        ));
    }

    #[test]
    fn test_tokens_are_url_safe_and_distinct() {
        let token = new_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, new_token());
    }
}
