//! Password hashing for the credential store
//!
//! Passwords are hashed with Argon2id into PHC strings, which carry their own salt and
//! parameters. Verification recomputes the hash and compares in constant time.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core},
};

use super::errors::StoreError;

/// Hash a password using Argon2id
///
/// # Returns
/// The Argon2 hash string (PHC format), including the random salt.
pub fn hash_password(password: impl AsRef<str>) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut rand_core::OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_ref().as_bytes(), &salt)
        .map_err(|e| StoreError::PasswordHashing {
            reason: e.to_string(),
        })?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against its stored hash
///
/// An unparsable stored hash never matches.
pub fn verify_password(password: impl AsRef<str>, password_hash: impl AsRef<str>) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(password_hash.as_ref()) else {
        tracing::warn!("Stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_ref().as_bytes(), &parsed_hash)
        .is_ok()
}

/// [`hash_password`] on tokio's blocking pool, keeping Argon2 off the request workers.
pub async fn hash_password_async(password: String) -> Result<String, StoreError> {
    tokio::task::spawn_blocking(move || hash_password(password))
        .await
        .map_err(|e| StoreError::PasswordHashing {
            reason: e.to_string(),
        })?
}

/// [`verify_password`] on tokio's blocking pool. A failed task never matches.
pub async fn verify_password_async(password: String, password_hash: String) -> bool {
    match tokio::task::spawn_blocking(move || verify_password(password, password_hash)).await {
        Ok(matched) => matched,
        Err(e) => {
            tracing::error!("Password verification task failed: {e}");
            false
        }
    }
}
