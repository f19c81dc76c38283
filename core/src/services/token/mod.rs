//! Token service module for credential issuance and rotation
//!
//! This module handles:
//! - JWT access token signing and verification
//! - Refresh secret generation and bcrypt hashing
//! - Login and the rotation protocol against the credential store

mod config;
pub mod secrets;
mod service;

#[cfg(test)]
mod tests;

pub use config::{SigningKey, TokenServiceConfig};
pub use service::TokenService;
