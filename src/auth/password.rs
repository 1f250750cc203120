//! Password hashing (argon2, PHC strings).

use std::sync::LazyLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

#[derive(thiserror::Error, Debug)]
pub enum PasswordError {
    #[error("argon2: {0}")]
    Hash(argon2::password_hash::Error),
}

pub fn hash(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(PasswordError::Hash)
}

/// A stored hash that fails to parse never matches.
pub fn verify(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}

/// Hash checked when a login names no account, so misses cost as much as wrong passwords.
static ABSENT_ACCOUNT: LazyLock<String> = LazyLock::new(|| hash("absent-account").unwrap_or_default());

/// Spend one verification on a username that does not exist.
pub fn verify_absent(password: &str) {
    verify(password, &ABSENT_ACCOUNT);
}
