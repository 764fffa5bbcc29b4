//! Password hashing with Argon2id.

use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use thiserror::Error;
use tokio::task;

/// Shortest password accepted at registration and reset.
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed")]
    Hash(#[from] password_hash::Error),

    #[error("password hashing task failed")]
    Task(#[from] task::JoinError),
}

/// Hash `password` into a PHC string on the blocking pool.
///
/// # Errors
///
/// Returns an error if hashing fails or the blocking task is cancelled.
pub async fn hash_password(password: String) -> Result<String, PasswordError> {
    task::spawn_blocking(move || -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string())
    })
    .await?
}

/// Check `password` against a stored PHC string on the blocking pool.
///
/// A mismatch is `Ok(false)`; only malformed hashes are errors.
///
/// # Errors
///
/// Returns an error if `hash` cannot be parsed or the blocking task fails.
pub async fn verify_password(password: String, hash: String) -> Result<bool, PasswordError> {
    task::spawn_blocking(move || -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(&hash)?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(error) => Err(error.into()),
        }
    })
    .await?
}
