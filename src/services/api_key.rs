//! API key generation and verification.
//!
//! Keys are shown once when issued. Only their SHA-256 digest is stored on
//! the user row.

use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::db::DbPool;
use crate::entity::user;
use crate::error::{AppError, AppResult};
use crate::models::AuthenticatedCaller;

/// API key prefix.
const KEY_PREFIX: &str = "prk_";
/// Length of random part of the key.
const KEY_RANDOM_LENGTH: usize = 40;

/// Generate a new random API key and its digest.
pub fn generate_key() -> (String, String) {
    let random_part: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(KEY_RANDOM_LENGTH)
        .map(char::from)
        .collect();

    let full_key = format!("{}{}", KEY_PREFIX, random_part);
    let key_hash = hash_key(&full_key);
    (full_key, key_hash)
}

/// Hash an API key using SHA-256.
pub fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a presented key against a stored digest.
fn key_matches(stored_hash: &str, key: &str) -> bool {
    stored_hash
        .as_bytes()
        .ct_eq(hash_key(key).as_bytes())
        .into()
}

/// Verify an email/key pair and return the authenticated caller.
///
/// Unknown users, users without a key and wrong keys all produce the same
/// message so callers cannot tell which accounts exist.
pub async fn verify_key(pool: &DbPool, email: &str, key: &str) -> AppResult<AuthenticatedCaller> {
    let invalid = || AppError::Unauthorized("Invalid API credentials".to_string());

    let user = pool.get_user_by_email(email).await?.ok_or_else(invalid)?;
    let stored = user.api_key_hash.as_deref().ok_or_else(invalid)?;
    if !key_matches(stored, key) {
        return Err(invalid());
    }

    if !user.is_active() {
        return Err(AppError::Unauthorized(
            "User account has been deactivated".to_string(),
        ));
    }

    AuthenticatedCaller::from_user(user)
}

/// Issue a new key for a user, replacing any previous one.
pub async fn issue_key(pool: &DbPool, user: &user::Model) -> AppResult<String> {
    let (full_key, key_hash) = generate_key();
    pool.set_user_api_key_hash(user.id, key_hash).await?;
    Ok(full_key)
}
