//! # Configuration Settings
//!
//! Host settings bound from the lower-case sections of the layered
//! configuration. Secret material (`ConnectionStrings`, `MySecrets`) lives in
//! the same store but is read through the secret provider, not bound here.

use crate::errors::{Error, Result};
use crate::secrets::VaultConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Host settings for the stratus service
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct AppSettings {
    /// HTTP server configuration
    #[validate(nested)]
    pub server: ServerConfig,

    /// Database pool configuration
    #[validate(nested)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[validate(nested)]
    pub logging: LoggingConfig,

    /// Secret provider configuration
    #[validate(nested)]
    pub secrets: SecretsConfig,

    /// Vault backend, required outside Development
    #[validate(nested)]
    pub vault: Option<VaultConfig>,
}

impl AppSettings {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;

        self.validate_custom()?;

        Ok(())
    }

    fn validate_custom(&self) -> Result<()> {
        if self.database.min_connections > self.database.max_connections {
            return Err(Error::validation(
                "database.min_connections cannot exceed database.max_connections",
            ));
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    /// Server port
    #[validate(range(min = 1, max = 65535, message = "Port must be between 1 and 65535"))]
    pub port: u16,

    /// Time allowed for in-flight requests after a shutdown signal
    #[validate(range(
        min = 1,
        max = 300,
        message = "Shutdown timeout must be between 1 and 300 seconds"
    ))]
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080, shutdown_timeout_seconds: 10 }
    }
}

impl ServerConfig {
    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_seconds)
    }
}

/// Database pool configuration. The connection string itself comes from the
/// secret provider (`DefaultConnection`).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Maximum number of connections in the pool
    #[validate(range(
        min = 1,
        max = 100,
        message = "Max connections must be between 1 and 100"
    ))]
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    #[validate(range(max = 50, message = "Min connections must be between 0 and 50"))]
    pub min_connections: u32,

    /// Time to wait for a free connection, in seconds
    #[validate(range(
        min = 1,
        max = 60,
        message = "Acquire timeout must be between 1 and 60 seconds"
    ))]
    pub acquire_timeout_seconds: u64,

    /// Idle timeout in seconds (0 = no timeout)
    pub idle_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 0,
            acquire_timeout_seconds: 10,
            idle_timeout_seconds: 600, // 10 minutes
        }
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }

    /// Get idle timeout as Duration (None if 0)
    pub fn idle_timeout(&self) -> Option<Duration> {
        if self.idle_timeout_seconds == 0 {
            None
        } else {
            Some(Duration::from_secs(self.idle_timeout_seconds))
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive (trace, debug, info, warn, error), overridden by `RUST_LOG`
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub level: String,

    /// Enable JSON structured logging
    pub json: bool,

    /// Service name attached to startup logs
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false, service_name: crate::APP_NAME.to_string() }
    }
}

/// Secret provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SecretsConfig {
    /// Section (local) or path prefix (remote) holding connection strings
    #[validate(length(min = 1, message = "Connection strings path cannot be empty"))]
    pub connection_strings_path: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            connection_strings_path: crate::secrets::DEFAULT_CONNECTION_STRINGS_SECTION.to_string(),
        }
    }
}
