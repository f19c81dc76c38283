use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use kt_core::domain::entities::token::TokenPair;

/// Body of `/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Opaque client identifier, bounded by the store's key column
    #[validate(length(min = 1, max = 255))]
    pub uuid: String,
}

/// Body of `/auth/update`
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    /// Last access token issued to the client, possibly expired
    pub jwt: String,

    /// Raw refresh secret issued alongside it
    pub refresh_token: String,
}

impl fmt::Debug for UpdateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateRequest")
            .field("jwt", &self.jwt)
            .field("refresh_token", &"[redacted]")
            .finish()
    }
}

/// Token pair as returned by login and update
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub jwt: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            jwt: pair.access_token,
            refresh_token: pair.refresh_token.into_inner(),
        }
    }
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("jwt", &self.jwt)
            .field("refresh_token", &"[redacted]")
            .finish()
    }
}

/// Body of `/auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub uuid: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use kt_core::domain::entities::token::RawRefreshSecret;

    #[test]
    fn test_login_request_validation() {
        assert!(LoginRequest { uuid: "u1".to_string() }.validate().is_ok());
        assert!(LoginRequest { uuid: String::new() }.validate().is_err());
        assert!(LoginRequest { uuid: "a".repeat(255) }.validate().is_ok());
        assert!(LoginRequest { uuid: "a".repeat(256) }.validate().is_err());
    }

    #[test]
    fn test_wire_names() {
        let request: UpdateRequest =
            serde_json::from_str(r#"{"jwt":"a.b.c","refreshToken":"c2VjcmV0"}"#).unwrap();
        assert_eq!(request.jwt, "a.b.c");
        assert_eq!(request.refresh_token, "c2VjcmV0");

        let pair = TokenPair::new(
            "a.b.c".to_string(),
            RawRefreshSecret::new("c2VjcmV0"),
            Duration::minutes(15),
            Duration::days(31),
        );
        let json = serde_json::to_value(TokenResponse::from(pair)).unwrap();
        assert_eq!(json["jwt"], "a.b.c");
        assert_eq!(json["refreshToken"], "c2VjcmV0");
    }

    #[test]
    fn test_debug_redacts_refresh_token() {
        let request = UpdateRequest {
            jwt: "a.b.c".to_string(),
            refresh_token: "c2VjcmV0".to_string(),
        };
        assert!(!format!("{:?}", request).contains("c2VjcmV0"));

        let response = TokenResponse {
            jwt: "a.b.c".to_string(),
            refresh_token: "c2VjcmV0".to_string(),
        };
        assert!(!format!("{:?}", response).contains("c2VjcmV0"));
    }
}
