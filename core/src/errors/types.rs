//! Error types for credential lifecycle and credential store operations
//!
//! Messages are safe to log and to return to clients: none of them carries a
//! raw refresh secret, a stored hash or the signing key.

use thiserror::Error;

/// Credential lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Access token signing failed")]
    SigningFailed,

    #[error("Secure randomness unavailable")]
    RandomnessUnavailable,

    #[error("Refresh token hashing failed")]
    HashingFailed,

    #[error("Invalid access token")]
    InvalidAccessToken,

    #[error("Access token expired")]
    AccessTokenExpired,

    #[error("Refresh token not found or expired")]
    UnknownOrExpiredRefreshToken,

    #[error("Refresh token mismatch")]
    RefreshTokenMismatch,
}

/// Credential store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Identifier already registered")]
    DuplicateIdentifier,

    #[error("Credential record not found")]
    NotFound,

    #[error("Credential store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    /// Wrap a backend failure
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable {
            message: message.into(),
        }
    }
}
