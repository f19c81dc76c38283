//! Configuration module with concern-specific sub-modules
//!
//! - `auth` - Signing key and credential expiry policy
//! - `database` - Credential store backend and connection pool
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server configuration

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{JwtConfig, DEVELOPMENT_JWT_SECRET, MAX_TOKEN_EXPIRY_SECONDS};
pub use database::{DatabaseConfig, StoreBackend};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Configuration problems detected at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("{key} must be set in {environment}")]
    Missing {
        key: &'static str,
        environment: Environment,
    },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Credential store configuration
    pub database: DatabaseConfig,

    /// Credential signing and expiry configuration
    pub jwt: JwtConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and validate it
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let config = Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        };
        config.validate()?;
        Ok(config)
    }

    /// Cross-section checks
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.validate()?;
        if self.environment.is_production() && self.jwt.is_using_default_secret() {
            return Err(ConfigError::Missing {
                key: "JWT_SECRET",
                environment: self.environment,
            });
        }
        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                key: "SERVER_PORT",
                reason: "must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_production_refuses_default_secret() {
        let config = AppConfig {
            environment: Environment::Production,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing { key: "JWT_SECRET", .. })
        ));

        let config = AppConfig {
            environment: Environment::Production,
            jwt: JwtConfig::new("rotated-production-key"),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
