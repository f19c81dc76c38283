//! # Infrastructure Layer
//!
//! Concrete implementations of the ports declared in `kt_core`:
//!
//! - **Database**: MySQL connection pool and the MySQL credential store, using SQLx

pub mod database;

pub use database::{DatabasePool, MySqlTokenRepository};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
