//! # Stratus
//!
//! Minimal web-service template with pluggable secret resolution. The service
//! exposes a demo `/weatherforecast` endpoint and resolves its database
//! connection string and structured secrets through a [`secrets::SecretProvider`]
//! chosen once at startup:
//!
//! ```text
//! Development  -> ConfigFileProvider   (layered appsettings files)
//! otherwise    -> RemoteSecretProvider (HashiCorp Vault KV v2)
//! ```
//!
//! ## Core Components
//!
//! - **Configuration**: layered `appsettings` files and `STRATUS__` environment overrides
//! - **Secrets**: the provider facade, its two variants and the factory selecting between them
//! - **REST API**: Axum router with health probes and OpenAPI docs in Development
//! - **Storage**: SQLx pool built from the resolved `DefaultConnection`

pub mod api;
pub mod config;
pub mod errors;
pub mod observability;
pub mod secrets;
pub mod services;
pub mod storage;

// Re-export commonly used types and traits
pub use config::{AppConfig, HostEnvironment};
pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
