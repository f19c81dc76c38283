//! Configuration for the token service

use chrono::Duration;
use jsonwebtoken::Algorithm;
use std::fmt;
use std::str::FromStr;

use kt_shared::config::{JwtConfig, DEVELOPMENT_JWT_SECRET, MAX_TOKEN_EXPIRY_SECONDS};

use crate::domain::entities::token::{ACCESS_TOKEN_EXPIRY_MINUTES, REFRESH_TOKEN_EXPIRY_DAYS};
use crate::errors::DomainError;

/// Symmetric key for signing access tokens. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(String);

impl SigningKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey([redacted])")
    }
}

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Access token signing key
    pub signing_key: SigningKey,
    /// HMAC signing algorithm
    pub algorithm: Algorithm,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh secret lifetime
    pub refresh_token_ttl: Duration,
    /// bcrypt cost for refresh secrets
    pub hash_cost: u32,
    /// Refuse rotation when the presented access token has expired
    pub reject_expired_access_on_rotation: bool,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            signing_key: SigningKey::new(DEVELOPMENT_JWT_SECRET),
            algorithm: Algorithm::HS512,
            access_token_ttl: Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES),
            refresh_token_ttl: Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
            hash_cost: bcrypt::DEFAULT_COST,
            reject_expired_access_on_rotation: false,
        }
    }
}

impl TokenServiceConfig {
    /// Create a configuration with the given signing key and defaults otherwise
    pub fn new(signing_key: SigningKey) -> Self {
        Self {
            signing_key,
            ..Default::default()
        }
    }

    /// Build from the shared JWT configuration section
    ///
    /// # Returns
    ///
    /// * `Ok(TokenServiceConfig)` - Validated configuration
    /// * `Err(DomainError::Internal)` - Algorithm is not an HMAC algorithm, or
    ///   a lifetime is not positive or exceeds `MAX_TOKEN_EXPIRY_SECONDS`
    pub fn from_jwt_config(jwt: &JwtConfig) -> Result<Self, DomainError> {
        let algorithm = parse_hmac_algorithm(&jwt.algorithm)?;

        Ok(Self {
            signing_key: SigningKey::new(jwt.secret.clone()),
            algorithm,
            access_token_ttl: ttl_from_seconds("access token", jwt.access_token_expiry)?,
            refresh_token_ttl: ttl_from_seconds("refresh token", jwt.refresh_token_expiry)?,
            hash_cost: jwt.refresh_hash_cost,
            reject_expired_access_on_rotation: jwt.reject_expired_on_rotate,
        })
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    pub fn with_refresh_token_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_token_ttl = ttl;
        self
    }

    pub fn reject_expired_access_on_rotation(mut self, reject: bool) -> Self {
        self.reject_expired_access_on_rotation = reject;
        self
    }
}

fn ttl_from_seconds(what: &str, seconds: i64) -> Result<Duration, DomainError> {
    if !(1..=MAX_TOKEN_EXPIRY_SECONDS).contains(&seconds) {
        return Err(DomainError::Internal {
            message: format!("Unsupported {} lifetime: {} seconds", what, seconds),
        });
    }
    Ok(Duration::seconds(seconds))
}

/// Only symmetric HMAC algorithms are accepted
fn parse_hmac_algorithm(name: &str) -> Result<Algorithm, DomainError> {
    match Algorithm::from_str(&name.to_uppercase()) {
        Ok(algorithm @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(algorithm),
        _ => Err(DomainError::Internal {
            message: format!("Unsupported signing algorithm: {}", name),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TokenServiceConfig::default();
        assert_eq!(config.algorithm, Algorithm::HS512);
        assert_eq!(config.access_token_ttl, Duration::minutes(15));
        assert_eq!(config.refresh_token_ttl, Duration::days(31));
        assert_eq!(config.hash_cost, bcrypt::DEFAULT_COST);
        assert!(!config.reject_expired_access_on_rotation);
    }

    #[test]
    fn test_from_jwt_config() {
        let jwt = JwtConfig::new("k")
            .with_access_expiry_minutes(5)
            .with_refresh_expiry_days(2)
            .with_hash_cost(4);

        let config = TokenServiceConfig::from_jwt_config(&jwt).unwrap();

        assert_eq!(config.signing_key, SigningKey::new("k"));
        assert_eq!(config.access_token_ttl, Duration::minutes(5));
        assert_eq!(config.refresh_token_ttl, Duration::days(2));
        assert_eq!(config.hash_cost, 4);
    }

    #[test]
    fn test_from_jwt_config_rejects_out_of_range_lifetimes() {
        let mut jwt = JwtConfig::new("k");
        jwt.refresh_token_expiry = i64::MAX;
        assert!(TokenServiceConfig::from_jwt_config(&jwt).is_err());

        let mut jwt = JwtConfig::new("k");
        jwt.access_token_expiry = 0;
        assert!(TokenServiceConfig::from_jwt_config(&jwt).is_err());
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!(parse_hmac_algorithm("hs256").unwrap(), Algorithm::HS256);
        assert_eq!(parse_hmac_algorithm("HS384").unwrap(), Algorithm::HS384);
        assert!(parse_hmac_algorithm("RS256").is_err());
        assert!(parse_hmac_algorithm("none").is_err());
    }

    #[test]
    fn test_debug_redacts_signing_key() {
        let config = TokenServiceConfig::new(SigningKey::new("super-secret-signing-key"));
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-signing-key"));
        assert!(rendered.contains("HS512"));
    }
}
