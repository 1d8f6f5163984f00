//! # Database Connection Pool Management
//!
//! The connection string is resolved through the secret provider, so the pool
//! is built from a [`SecretString`] rather than a configured URL.

use crate::config::DatabaseConfig;
use crate::errors::{Error, Result};
use crate::secrets::SecretString;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

/// Type alias for the database connection pool
pub type DbPool = AnyPool;

/// Create a lazily connected pool for `connection_string`.
///
/// The URL scheme selects the driver (`sqlite:` or `postgres:`). No
/// connection is opened until first use; readiness probes surface
/// connectivity problems.
pub fn create_pool(connection_string: &SecretString, config: &DatabaseConfig) -> Result<DbPool> {
    sqlx::any::install_default_drivers();

    let url = connection_string.expose_secret();

    let pool_options = AnyPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout())
        .test_before_acquire(true);

    let pool_options = if let Some(idle_timeout) = config.idle_timeout() {
        pool_options.idle_timeout(idle_timeout)
    } else {
        pool_options
    };

    let pool = pool_options.connect_lazy(url).map_err(|e| {
        tracing::error!(error = %e, url = %sanitize_url(url), "Failed to create database pool");
        Error::database(e, format!("Invalid connection string: {}", sanitize_url(url)))
    })?;

    tracing::info!(
        database_type = database_type(url),
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        acquire_timeout_ms = config.acquire_timeout().as_millis(),
        idle_timeout_ms = config.idle_timeout().map(|d| d.as_millis()),
        "Database connection pool created"
    );

    Ok(pool)
}

/// Runs a trivial query to confirm the database answers.
pub async fn ping(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| Error::database(e, "Database readiness check failed"))
}

fn database_type(url: &str) -> &'static str {
    if url.starts_with("sqlite:") {
        "sqlite"
    } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        "postgresql"
    } else {
        "unknown"
    }
}

/// Sanitize database URL for logging (remove credentials)
pub fn sanitize_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        if parsed.password().is_some() || !parsed.username().is_empty() {
            // Hide credentials in logs
            format!(
                "{}://***:***@{}{}",
                parsed.scheme(),
                parsed.host_str().unwrap_or("unknown"),
                parsed.path()
            )
        } else {
            url.to_string()
        }
    } else {
        // Not a URL, so it may be a key/value string carrying a password
        "[unparseable connection string]".to_string()
    }
}
