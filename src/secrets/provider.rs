//! The secret provider facade.
//!
//! Application code holds a [`SecretProvider`] and never inspects which
//! variant it is. Both variants resolve the same two operations:
//!
//! - [`SecretProvider::get_connection_string`] returns a named connection string
//! - [`SecretProvider::get_secret`] binds a structured secret into a caller type
//!
//! The `_with` variants accept a [`CancellationToken`]; a token cancelled
//! before the lookup completes yields [`SecretsError::Cancelled`].

use std::future::Future;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::config_file::ConfigFileProvider;
use super::error::{Result, SecretsError};
use super::remote::RemoteSecretProvider;
use super::types::{ProviderMode, SecretString};

/// Secret source chosen once at startup.
#[derive(Debug, Clone)]
pub enum SecretProvider {
    LocalConfig(ConfigFileProvider),
    Remote(RemoteSecretProvider),
}

impl SecretProvider {
    pub fn mode(&self) -> ProviderMode {
        match self {
            Self::LocalConfig(_) => ProviderMode::LocalConfig,
            Self::Remote(_) => ProviderMode::Remote,
        }
    }

    /// Resolves the connection string named `key`.
    ///
    /// # Errors
    ///
    /// - [`SecretsError::NotFound`] if the key is absent or empty
    /// - [`SecretsError::BackendUnavailable`] if the remote backend cannot be reached
    pub async fn get_connection_string(&self, key: &str) -> Result<SecretString> {
        let span = crate::secret_span!("get_connection_string", key);
        let result = async {
            match self {
                Self::LocalConfig(provider) => provider.get_connection_string(key),
                Self::Remote(provider) => provider.get_connection_string(key).await,
            }
        }
        .instrument(span)
        .await;

        match &result {
            Ok(_) => tracing::debug!(key = %key, mode = %self.mode(), "Resolved connection string"),
            Err(e) => {
                tracing::debug!(key = %key, mode = %self.mode(), error = %e, "Connection string lookup failed")
            }
        }

        result
    }

    /// Resolves the structured secret at `path` into `T`.
    ///
    /// # Errors
    ///
    /// - [`SecretsError::NotFound`] if nothing is stored at `path`
    /// - [`SecretsError::Deserialization`] if the payload does not fit `T`
    /// - [`SecretsError::BackendUnavailable`] if the remote backend cannot be reached
    pub async fn get_secret<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let span = crate::secret_span!("get_secret", path);
        let result = async {
            match self {
                Self::LocalConfig(provider) => provider.get_secret(path),
                Self::Remote(provider) => provider.get_secret(path).await,
            }
        }
        .instrument(span)
        .await;

        if let Err(ref e) = result {
            tracing::debug!(path = %path, mode = %self.mode(), error = %e, "Secret lookup failed");
        }

        result
    }

    pub async fn get_connection_string_with(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<SecretString> {
        cancellable(cancel, format!("get_connection_string({})", key), self.get_connection_string(key))
            .await
    }

    pub async fn get_secret_with<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<T> {
        cancellable(cancel, format!("get_secret({})", path), self.get_secret(path)).await
    }

    /// Verifies the backend is reachable. Always succeeds for local config.
    pub async fn health_check(&self) -> Result<()> {
        match self {
            Self::LocalConfig(_) => Ok(()),
            Self::Remote(provider) => provider.health_check().await,
        }
    }
}

async fn cancellable<T>(
    cancel: &CancellationToken,
    operation: String,
    lookup: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!(operation = %operation, "Secret lookup cancelled");
            Err(SecretsError::cancelled(operation))
        }
        result = lookup => result,
    }
}
