//! Domain entities representing credentials and their store records.

pub mod token;

// Re-export commonly used types
pub use token::{
    AccessTokenStatus, Claims, ClientId, RawRefreshSecret, RefreshCredentialRecord, TokenPair,
    ACCESS_TOKEN_EXPIRY_MINUTES, REFRESH_SECRET_BYTES, REFRESH_TOKEN_EXPIRY_DAYS,
};
