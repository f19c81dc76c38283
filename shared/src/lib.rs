//! Shared configuration and wire types for the Keyturn server
//!
//! - Configuration types loaded from the environment
//! - The error body returned by every endpoint
//! - Health check response types

pub mod config;
pub mod errors;
pub mod types;

pub use config::{
    AppConfig, ConfigError, DatabaseConfig, Environment, JwtConfig, LogFormat, LoggingConfig,
    ServerConfig, StoreBackend,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{HealthResponse, HealthStatus, ServiceHealth};
