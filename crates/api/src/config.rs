//! Application configuration loaded from environment variables.

use std::time::Duration;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `TABLE_NAME` — DynamoDB table name; unset or empty selects the
///   in-memory store
/// - `DYNAMO_ENDPOINT_URL` — custom endpoint for DynamoDB Local (optional)
/// - `STORE_TIMEOUT_MS` — per-operation storage deadline (default: 5000)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub table_name: Option<String>,
    pub dynamo_endpoint_url: Option<String>,
    pub store_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            table_name: std::env::var("TABLE_NAME").ok().filter(|t| !t.is_empty()),
            dynamo_endpoint_url: std::env::var("DYNAMO_ENDPOINT_URL")
                .ok()
                .filter(|u| !u.is_empty()),
            store_timeout: Duration::from_millis(
                std::env::var("STORE_TIMEOUT_MS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(5000),
            ),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            table_name: None,
            dynamo_endpoint_url: None,
            store_timeout: Duration::from_millis(5000),
        }
    }
}
