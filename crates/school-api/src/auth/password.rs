//! Argon2 password storage for user and admin credentials.
//!
//! Hashing and verification are CPU-bound; the async entry points run them on
//! tokio's blocking pool so request workers stay free.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;
use tokio::task;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("stored hash is malformed: {0}")]
    MalformedHash(String),
    #[error("password task did not complete: {0}")]
    Task(#[from] task::JoinError),
}

/// Hash that unknown logins are checked against, so a miss costs one Argon2
/// verification like a hit does.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_blocking("school-api unknown account").unwrap_or_default())
}

fn hash_blocking(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

fn verify_blocking(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub struct PasswordService;

impl PasswordService {
    pub async fn hash(password: String) -> Result<String, PasswordError> {
        task::spawn_blocking(move || hash_blocking(&password)).await?
    }

    pub async fn hash_optional(password: Option<String>) -> Result<Option<String>, PasswordError> {
        match password {
            Some(pw) => Self::hash(pw).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn verify(password: String, hash: String) -> Result<bool, PasswordError> {
        task::spawn_blocking(move || verify_blocking(&password, &hash)).await?
    }

    /// Spends the same work as [`PasswordService::verify`] for a login with no account.
    /// Always false.
    pub async fn verify_unknown(password: String) -> bool {
        task::spawn_blocking(move || {
            let _ = verify_blocking(&password, dummy_hash());
        })
        .await
        .ok();
        false
    }
}
