//! Credential issuance configuration

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ConfigError;

/// Secret used when `JWT_SECRET` is not set. Refused in production.
pub const DEVELOPMENT_JWT_SECRET: &str = "development-secret-please-change-in-production";

/// Longest accepted access or refresh lifetime (10 years, in seconds)
pub const MAX_TOKEN_EXPIRY_SECONDS: i64 = 10 * 365 * 86400;

/// Signing and expiry policy for access and refresh credentials
#[derive(Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Symmetric key for signing access tokens
    pub secret: String,

    /// HMAC algorithm name (HS256, HS384 or HS512)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// bcrypt cost applied to refresh secrets before storage
    #[serde(default = "default_hash_cost")]
    pub refresh_hash_cost: u32,

    /// Refuse rotation when the presented access token has expired
    #[serde(default)]
    pub reject_expired_on_rotate: bool,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEVELOPMENT_JWT_SECRET),
            algorithm: default_algorithm(),
            access_token_expiry: 900,       // 15 minutes
            refresh_token_expiry: 2_678_400, // 31 days
            refresh_hash_cost: default_hash_cost(),
            reject_expired_on_rotate: false,
        }
    }
}

// The secret never reaches log output.
impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[redacted]")
            .field("algorithm", &self.algorithm)
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .field("refresh_hash_cost", &self.refresh_hash_cost)
            .field("reject_expired_on_rotate", &self.reject_expired_on_rotate)
            .finish()
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            algorithm: std::env::var("JWT_ALGORITHM").unwrap_or(defaults.algorithm),
            access_token_expiry: std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.access_token_expiry),
            refresh_token_expiry: std::env::var("REFRESH_TOKEN_EXPIRY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.refresh_token_expiry),
            refresh_hash_cost: std::env::var("REFRESH_TOKEN_HASH_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.refresh_hash_cost),
            reject_expired_on_rotate: std::env::var("JWT_REJECT_EXPIRED_ON_ROTATE")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.reject_expired_on_rotate),
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Set the bcrypt cost for refresh secrets
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.refresh_hash_cost = cost;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEVELOPMENT_JWT_SECRET
    }

    /// Check the values that would otherwise fail at first use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                reason: "must not be empty".to_string(),
            });
        }
        if !matches!(self.algorithm.to_uppercase().as_str(), "HS256" | "HS384" | "HS512") {
            return Err(ConfigError::Invalid {
                key: "JWT_ALGORITHM",
                reason: format!("unsupported algorithm {}", self.algorithm),
            });
        }
        check_expiry("JWT_ACCESS_TOKEN_EXPIRY", self.access_token_expiry)?;
        check_expiry("REFRESH_TOKEN_EXPIRY", self.refresh_token_expiry)?;
        // bcrypt accepts costs 4..=31
        if !(4..=31).contains(&self.refresh_hash_cost) {
            return Err(ConfigError::Invalid {
                key: "REFRESH_TOKEN_HASH_COST",
                reason: format!("{} is outside 4..=31", self.refresh_hash_cost),
            });
        }
        Ok(())
    }
}

fn check_expiry(key: &'static str, seconds: i64) -> Result<(), ConfigError> {
    if seconds <= 0 {
        return Err(ConfigError::Invalid {
            key,
            reason: "must be positive".to_string(),
        });
    }
    if seconds > MAX_TOKEN_EXPIRY_SECONDS {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("must not exceed {} seconds", MAX_TOKEN_EXPIRY_SECONDS),
        });
    }
    Ok(())
}

fn default_algorithm() -> String {
    String::from("HS512")
}

fn default_hash_cost() -> u32 {
    12
}
