//! # Keyturn Core
//!
//! Domain layer for issuing and rotating access/refresh credential pairs.
//! This crate contains the credential entities, the error taxonomy, the
//! credential store interface and the token lifecycle service.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::token::{
    AccessTokenStatus, Claims, ClientId, RawRefreshSecret, RefreshCredentialRecord, TokenPair,
};
pub use errors::{DomainError, DomainResult, StoreError, TokenError};
pub use repositories::{InMemoryTokenRepository, TokenRepository};
pub use services::{SigningKey, TokenService, TokenServiceConfig};
