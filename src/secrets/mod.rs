//! Secret resolution for configuration values.
//!
//! Connection strings and structured secrets are resolved through a single
//! [`SecretProvider`], chosen once at startup by [`ProviderFactory`] from the
//! host environment:
//!
//! - **Development**: [`ConfigFileProvider`] reads the layered `appsettings`
//!   configuration already loaded into memory
//! - **Everything else**: [`RemoteSecretProvider`] fetches from HashiCorp Vault
//!   KV v2 through [`VaultKvClient`]
//!
//! # Example
//!
//! ```rust,ignore
//! use stratus::secrets::ProviderFactory;
//!
//! let provider = ProviderFactory::create(config.provider_mode(), &config)?;
//! provider.health_check().await?;
//!
//! let connection = provider.get_connection_string("DefaultConnection").await?;
//! let settings: ApiSettings = provider.get_secret("MySecrets").await?;
//! ```
//!
//! # Security
//!
//! Connection strings are returned as [`SecretString`], which is zeroed on
//! drop and redacted in `Debug`, `Display` and serialized output. Neither
//! provider logs secret values, only keys and paths.

mod config_file;
mod error;
mod factory;
mod provider;
mod remote;
mod types;
mod vault;

pub use config_file::{ConfigFileProvider, DEFAULT_CONNECTION_STRINGS_SECTION};
pub use error::{Result, SecretsError};
pub use factory::ProviderFactory;
pub use provider::SecretProvider;
pub use remote::{RemoteSecretClient, RemoteSecretProvider};
pub use types::{ProviderMode, SecretKey, SecretString};
pub use vault::{VaultConfig, VaultKvClient};
