//! Secret lookups against a remote secret-management backend.
//!
//! The provider owns the lookup semantics (path layout, UTF-8 and JSON
//! decoding, error classification) and delegates transport to a
//! [`RemoteSecretClient`]. Each lookup is exactly one `fetch_raw` call: no
//! retry, no timeout, no cache.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::config_file::DEFAULT_CONNECTION_STRINGS_SECTION;
use super::error::{Result, SecretsError};
use super::types::{SecretKey, SecretString};

/// Field holding a connection string stored as a one-field object.
const VALUE_FIELD: &str = "value";

/// Transport to a remote secret store.
///
/// Implementations map a missing path to [`SecretsError::NotFound`] and any
/// transport or server failure to [`SecretsError::BackendUnavailable`]. They
/// must not log payloads.
#[async_trait]
pub trait RemoteSecretClient: Send + Sync + fmt::Debug {
    /// Fetch the raw payload stored at `path`.
    async fn fetch_raw(&self, path: &str) -> Result<Vec<u8>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

/// Remote variant of the secret provider.
#[derive(Debug, Clone)]
pub struct RemoteSecretProvider {
    client: Arc<dyn RemoteSecretClient>,
    connection_strings_path: String,
}

impl RemoteSecretProvider {
    pub fn new(client: Arc<dyn RemoteSecretClient>) -> Self {
        Self::with_connection_strings_path(client, DEFAULT_CONNECTION_STRINGS_SECTION)
    }

    pub fn with_connection_strings_path(
        client: Arc<dyn RemoteSecretClient>,
        path: impl Into<String>,
    ) -> Self {
        let path: String = path.into();
        Self { client, connection_strings_path: path.trim_matches('/').to_string() }
    }

    /// Backend path holding the connection string named `key`.
    pub fn connection_string_path(&self, key: &SecretKey) -> String {
        let key = key.as_str().replace(':', "/");
        if self.connection_strings_path.is_empty() {
            key
        } else {
            format!("{}/{}", self.connection_strings_path, key)
        }
    }

    /// Fetches `<connection_strings_path>/<key>`.
    ///
    /// A payload that is exactly `{"value": "<string>"}` yields that string;
    /// anything else is returned verbatim.
    pub async fn get_connection_string(&self, key: &str) -> Result<SecretString> {
        let key = SecretKey::parse(key)?;
        let path = self.connection_string_path(&key);

        let raw = self.client.fetch_raw(&path).await?;
        let value = match single_value(&raw) {
            Some(value) => value,
            None => String::from_utf8(raw).map_err(|_| {
                SecretsError::deserialization(&path, "connection string is not valid UTF-8")
            })?,
        };

        if value.is_empty() {
            return Err(SecretsError::not_found(key.as_str()));
        }
        Ok(SecretString::new(value))
    }

    /// Fetches `path` and parses the payload as JSON into `T`.
    pub async fn get_secret<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let key = SecretKey::parse(path)?;

        let raw = self.client.fetch_raw(key.as_str()).await?;

        serde_json::from_slice::<T>(&raw)
            .map_err(|e| SecretsError::deserialization(key.as_str(), e.to_string()))
    }

    pub async fn health_check(&self) -> Result<()> {
        self.client.health_check().await
    }
}

fn single_value(raw: &[u8]) -> Option<String> {
    match serde_json::from_slice::<Value>(raw).ok()? {
        Value::Object(mut map) if map.len() == 1 => match map.remove(VALUE_FIELD)? {
            Value::String(value) => Some(value),
            _ => None,
        },
        _ => None,
    }
}
