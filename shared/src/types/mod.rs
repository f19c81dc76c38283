//! Wire types shared between crates

pub mod response;

pub use response::{HealthResponse, HealthStatus, ServiceHealth};
