//! Health check response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: HealthStatus,

    /// Individual service health checks
    pub services: HashMap<String, ServiceHealth>,

    /// Server timestamp
    pub timestamp: DateTime<Utc>,

    /// Server version
    pub version: String,
}

impl HealthResponse {
    /// Build a response whose overall status is the worst of its services
    pub fn from_services(services: HashMap<String, ServiceHealth>, version: impl Into<String>) -> Self {
        let status = services
            .values()
            .map(|s| s.status)
            .max_by_key(|s| match s {
                HealthStatus::Healthy => 0,
                HealthStatus::Degraded => 1,
                HealthStatus::Unhealthy => 2,
            })
            .unwrap_or(HealthStatus::Healthy);

        Self {
            status,
            services,
            timestamp: Utc::now(),
            version: version.into(),
        }
    }
}

/// Health status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual service health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Service status
    pub status: HealthStatus,

    /// Health check message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
