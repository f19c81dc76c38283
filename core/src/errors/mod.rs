//! Domain-specific error types and error handling.

mod types;


pub use types::{StoreError, TokenError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// The request failed because of what the client sent
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::Store(StoreError::DuplicateIdentifier)
                | DomainError::Token(
                    TokenError::InvalidAccessToken
                        | TokenError::AccessTokenExpired
                        | TokenError::UnknownOrExpiredRefreshToken
                        | TokenError::RefreshTokenMismatch
                )
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
