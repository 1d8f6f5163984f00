//! Builds the process-wide [`SecretProvider`] once at startup.

use std::sync::Arc;

use super::config_file::ConfigFileProvider;
use super::error::{Result, SecretsError};
use super::provider::SecretProvider;
use super::remote::{RemoteSecretClient, RemoteSecretProvider};
use super::types::ProviderMode;
use super::vault::VaultKvClient;
use crate::config::{AppConfig, SecretsConfig};

pub struct ProviderFactory;

impl ProviderFactory {
    /// Builds the provider for `mode`.
    ///
    /// `LocalConfig` reads from the loaded configuration store; `Remote`
    /// talks to Vault using the `vault` settings section. No network call is
    /// made here.
    ///
    /// # Errors
    ///
    /// - [`SecretsError::Config`] if `Remote` is requested without a `vault`
    ///   section, or the Vault client cannot be built
    pub fn create(mode: ProviderMode, config: &AppConfig) -> Result<SecretProvider> {
        let secrets = &config.settings.secrets;

        let provider = match mode {
            ProviderMode::LocalConfig => {
                SecretProvider::LocalConfig(ConfigFileProvider::with_connection_strings_section(
                    config.store(),
                    secrets.connection_strings_path.as_str(),
                ))
            }
            ProviderMode::Remote => {
                let vault = config.settings.vault.clone().ok_or_else(|| {
                    SecretsError::config_error(format!(
                        "Environment '{}' reads secrets from Vault but no 'vault' section is configured",
                        config.environment
                    ))
                })?;
                let client = VaultKvClient::new(vault.with_env_token())?;
                Self::remote(Arc::new(client), secrets)
            }
        };

        tracing::info!(mode = %provider.mode(), environment = %config.environment, "Secret provider selected");

        Ok(provider)
    }

    /// Builds the remote variant around any [`RemoteSecretClient`].
    pub fn remote(client: Arc<dyn RemoteSecretClient>, secrets: &SecretsConfig) -> SecretProvider {
        SecretProvider::Remote(RemoteSecretProvider::with_connection_strings_path(
            client,
            secrets.connection_strings_path.as_str(),
        ))
    }
}
