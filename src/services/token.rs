//! One-time confirmation tokens for deletion requests.
//!
//! The plaintext token only ever exists in memory and in the review link
//! sent to institutional admins. The database keeps an argon2 PHC hash.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::RngCore;

use crate::error::{AppError, AppResult};

/// Random bytes per token; hex encoding doubles the length.
const TOKEN_BYTES: usize = 16;

/// A freshly issued token and the hash to store.
#[derive(Debug, Clone)]
pub struct ConfirmationToken {
    pub plaintext: String,
    pub encrypted: String,
}

/// Generate a random token and hash it for storage.
pub fn issue() -> AppResult<ConfirmationToken> {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    let plaintext = hex::encode(bytes);
    let encrypted = encrypt(&plaintext)?;
    Ok(ConfirmationToken {
        plaintext,
        encrypted,
    })
}

/// Hash a token with argon2id.
pub fn encrypt(token: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(token.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash token: {e}")))
}

/// True when `token` matches the stored hash. A malformed hash never matches.
pub fn verify(token: &str, encrypted: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(encrypted) else {
        return false;
    };
    Argon2::default()
        .verify_password(token.as_bytes(), &parsed)
        .is_ok()
}

/// Fail with [`AppError::InvalidToken`] unless `token` matches.
pub fn require_match(token: &str, encrypted: &str) -> AppResult<()> {
    if verify(token, encrypted) {
        Ok(())
    } else {
        Err(AppError::InvalidToken)
    }
}
