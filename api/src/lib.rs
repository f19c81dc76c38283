//! # Keyturn API
//!
//! actix-web transport for the credential lifecycle: request decoding,
//! error mapping and the application factory used by the binary and tests.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;
