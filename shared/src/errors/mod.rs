//! Shared error response structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard error body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Error codes used on the wire
pub mod error_codes {
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const ALREADY_REGISTERED: &str = "ALREADY_REGISTERED";
    pub const INVALID_ACCESS_TOKEN: &str = "INVALID_ACCESS_TOKEN";
    pub const ACCESS_TOKEN_EXPIRED: &str = "ACCESS_TOKEN_EXPIRED";
    pub const REFRESH_TOKEN_EXPIRED: &str = "REFRESH_TOKEN_EXPIRED";
    pub const REFRESH_TOKEN_MISMATCH: &str = "REFRESH_TOKEN_MISMATCH";
    pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse::new(error_codes::ALREADY_REGISTERED, "already registered");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["error"], "ALREADY_REGISTERED");
        assert_eq!(json["message"], "already registered");
        assert!(json["timestamp"].is_string());
    }
}
