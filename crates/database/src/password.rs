//! Password hashing for the local login endpoint.
//!
//! Digests are argon2id PHC strings, so parameters and salt travel with the
//! stored value.

use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::{DatabaseError, Result};

/// Hash a plain password with argon2id and a fresh salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DatabaseError::PasswordHash(e.to_string()))
}

/// Verify a password against a stored argon2 digest.
///
/// Malformed digests never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
