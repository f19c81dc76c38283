//! Server configuration module

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Keep-alive timeout in seconds
    #[serde(default = "default_keep_alive")]
    pub keep_alive: u64,

    /// Time allowed for a client to send the request head, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Grace period for in-flight requests on shutdown, in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
            workers: 0, // Use all CPU cores
            keep_alive: default_keep_alive(),
            request_timeout: default_request_timeout(),
            shutdown_timeout: default_shutdown_timeout(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let parse = |key: &str| std::env::var(key).ok().and_then(|v| v.parse::<u64>().ok());

        Self {
            host: std::env::var("SERVER_HOST").unwrap_or(defaults.host),
            port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            workers: std::env::var("SERVER_WORKERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.workers),
            keep_alive: parse("SERVER_KEEP_ALIVE").unwrap_or(defaults.keep_alive),
            request_timeout: parse("SERVER_REQUEST_TIMEOUT").unwrap_or(defaults.request_timeout),
            shutdown_timeout: parse("SERVER_SHUTDOWN_TIMEOUT").unwrap_or(defaults.shutdown_timeout),
        }
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_keep_alive() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    5
}

fn default_shutdown_timeout() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.workers, 0);
        assert_eq!(config.request_timeout, 5);
        assert_eq!(config.keep_alive, 10);
        assert_eq!(config.shutdown_timeout, 5);
    }

    #[test]
    fn test_bind_address() {
        let config = ServerConfig::new("localhost", 3000);
        assert_eq!(config.bind_address(), "localhost:3000");
    }
}
