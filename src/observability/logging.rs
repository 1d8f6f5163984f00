//! # Structured Logging
//!
//! Provides the global subscriber and structured logging macros using the
//! tracing ecosystem. `RUST_LOG` takes precedence over the configured level.

use crate::config::{AppConfig, LoggingConfig};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Create a tracing span for request tracking.
///
/// ```rust,ignore
/// let span = request_span!("GET", "/weatherforecast");
/// let span = request_span!("GET", "/health/ready", probe = "readiness");
/// ```
#[macro_export]
macro_rules! request_span {
    ($method:expr, $path:expr) => {
        tracing::info_span!(
            "http_request",
            method = %$method,
            path = %$path,
            request_id = %uuid::Uuid::new_v4()
        )
    };
    ($method:expr, $path:expr, $($field:tt)*) => {
        tracing::info_span!(
            "http_request",
            method = %$method,
            path = %$path,
            request_id = %uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

/// Create a tracing span for a secret lookup. Never pass secret values.
#[macro_export]
macro_rules! secret_span {
    ($operation:expr, $key:expr) => {
        tracing::debug_span!(
            "secret_lookup",
            operation = %$operation,
            key = %$key,
            operation_id = %uuid::Uuid::new_v4()
        )
    };
}

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed (e.g. by a test
/// harness); the existing one is kept.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = if config.json {
        tracing::subscriber::set_global_default(
            FmtSubscriber::builder().with_env_filter(filter).json().finish(),
        )
    } else {
        tracing::subscriber::set_global_default(
            FmtSubscriber::builder().with_env_filter(filter).finish(),
        )
    };

    result.is_ok()
}

/// Log configuration at startup
pub fn log_config_info(config: &AppConfig) {
    let settings = &config.settings;
    tracing::info!(
        service_name = %settings.logging.service_name,
        version = crate::VERSION,
        environment = %config.environment,
        secret_provider = %config.provider_mode(),
        server_address = %settings.server.bind_address(),
        vault_address = settings.vault.as_ref().map(|v| v.address.as_str()),
        db_max_connections = settings.database.max_connections,
        json_logging = settings.logging.json,
        "Stratus configuration"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppSettings, HostEnvironment};
    use config::{Config, File, FileFormat};
    use tracing_test::traced_test;

    #[test]
    fn test_macros_compile() {
        let _span = request_span!("GET", "/weatherforecast");
        let _span = request_span!("GET", "/health/ready", probe = "readiness");
        let _span = secret_span!("get_connection_string", "DefaultConnection");
    }

    #[traced_test]
    #[test]
    fn test_log_config_info() {
        let store = Config::builder()
            .add_source(File::from_str(
                r#"{"ConnectionStrings": {"DefaultConnection": "sqlite::memory:"}}"#,
                FileFormat::Json,
            ))
            .build()
            .unwrap();
        let config = AppConfig::from_store(HostEnvironment::Development, store).unwrap();
        assert_eq!(config.settings.server.port, AppSettings::default().server.port);

        log_config_info(&config);

        assert!(logs_contain("Stratus configuration"));
        assert!(logs_contain("local_config"));
        assert!(!logs_contain("sqlite::memory:"));
    }
}
