//! Salted password hashing

use std::sync::OnceLock;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};

use crate::error::{AppError, AppResult};

/// Hash a password into an Argon2id PHC string with a fresh random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::PasswordHash(format!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(hash)
}

/// Check a password against a stored PHC string
pub fn verify_password(encoded: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(encoded)
        .map_err(|e| AppError::PasswordHash(format!("Failed to parse password hash: {}", e)))?;

    let argon2 = Argon2::default();
    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash of a password nobody knows, computed once
fn dummy_hash() -> AppResult<&'static str> {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();

    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash.as_str());
    }
    let hash = hash_password("unknown-user-placeholder")?;
    Ok(DUMMY_HASH.get_or_init(|| hash).as_str())
}

/// Spend the same Argon2 work as [`verify_password`] for a user that does not exist
///
/// Always `false`.
pub fn verify_unknown_user(password: &str) -> AppResult<bool> {
    verify_password(dummy_hash()?, password).map(|_| false)
}

/// [`hash_password`] on the blocking thread pool
pub async fn hash_password_blocking(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
}

/// [`verify_password`] on the blocking thread pool
pub async fn verify_password_blocking(encoded: String, password: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&encoded, &password))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
}

/// [`verify_unknown_user`] on the blocking thread pool
pub async fn verify_unknown_user_blocking(password: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || verify_unknown_user(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
}
