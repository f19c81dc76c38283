//! Refresh secret generation and one-way hashing

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::domain::entities::token::{RawRefreshSecret, REFRESH_SECRET_BYTES};
use crate::errors::TokenError;

/// Draw a new refresh secret from the operating system CSPRNG
pub fn generate_refresh_secret() -> Result<RawRefreshSecret, TokenError> {
    let mut bytes = [0u8; REFRESH_SECRET_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|_| TokenError::RandomnessUnavailable)?;
    Ok(RawRefreshSecret::new(STANDARD.encode(bytes)))
}

/// Salted bcrypt hash of a refresh secret
///
/// CPU-bound; call from a blocking context.
pub fn hash_refresh_secret(secret: &RawRefreshSecret, cost: u32) -> Result<String, TokenError> {
    bcrypt::hash(secret.expose_secret(), cost).map_err(|_| TokenError::HashingFailed)
}

/// Check a candidate secret against a stored bcrypt hash
///
/// A malformed hash never verifies.
pub fn verify_refresh_secret(secret: &RawRefreshSecret, hash: &str) -> bool {
    bcrypt::verify(secret.expose_secret(), hash).unwrap_or(false)
}
