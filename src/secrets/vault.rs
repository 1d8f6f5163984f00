//! HashiCorp Vault KV v2 transport for the remote secret provider.
//!
//! # Payload convention
//!
//! Vault KV v2 stores a JSON object per path and [`VaultKvClient::fetch_raw`]
//! returns that object's JSON encoding unchanged. A connection string is
//! written as a single `value` field, which the remote provider unwraps;
//! typed secrets are bound from the whole object:
//!
//! ```text
//! vault kv put secret/ConnectionStrings/DefaultConnection value='postgres://app@db/app'
//! vault kv put secret/MySecrets ApiKey=prod-key BaseUrl=https://api.example.com TimeoutSeconds=30
//! ```
//!
//! Note that `vault kv put` stores every field as a string; write typed
//! payloads with `vault kv put secret/MySecrets @settings.json` when the
//! target shape has numeric fields.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;
use vaultrs::client::{VaultClient, VaultClientSettingsBuilder};
use vaultrs::error::ClientError;
use vaultrs::kv2;

use super::error::{Result, SecretsError};
use super::remote::RemoteSecretClient;
use super::types::SecretString;

/// Configuration for the Vault backend, bound from the `vault` section.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VaultConfig {
    /// Vault server address (e.g., "https://vault.example.com:8200")
    #[validate(length(min = 1, message = "Vault address cannot be empty"))]
    pub address: String,

    /// Vault token. Falls back to `VAULT_TOKEN` when absent.
    #[serde(default)]
    pub token: Option<SecretString>,

    /// Vault namespace (Enterprise multi-tenancy)
    #[serde(default)]
    pub namespace: Option<String>,

    /// KV v2 mount path
    #[serde(default = "default_mount_path")]
    #[validate(length(min = 1, message = "Vault mount path cannot be empty"))]
    pub mount_path: String,
}

fn default_mount_path() -> String {
    "secret".to_string()
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            address: "http://127.0.0.1:8200".to_string(),
            token: None,
            namespace: None,
            mount_path: default_mount_path(),
        }
    }
}

impl VaultConfig {
    /// Fill the token from `VAULT_TOKEN` if the configuration has none.
    pub fn with_env_token(mut self) -> Self {
        if self.token.is_none() {
            self.token = std::env::var("VAULT_TOKEN").ok().map(SecretString::new);
        }
        self
    }
}

/// Reads secrets from a Vault KV v2 mount.
pub struct VaultKvClient {
    client: VaultClient,
    address: String,
    mount_path: String,
}

impl std::fmt::Debug for VaultKvClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultKvClient")
            .field("address", &self.address)
            .field("mount_path", &self.mount_path)
            .field("client", &"[VaultClient]")
            .finish()
    }
}

impl VaultKvClient {
    /// Builds the client. No request is made until the first lookup or
    /// [`RemoteSecretClient::health_check`].
    ///
    /// # Errors
    ///
    /// - [`SecretsError::Config`] if the configuration is invalid
    pub fn new(config: VaultConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| SecretsError::config_error(format!("Invalid Vault configuration: {}", e)))?;

        let mut settings_builder = VaultClientSettingsBuilder::default();
        settings_builder.address(&config.address);

        if let Some(ref token) = config.token {
            settings_builder.token(token.expose_secret());
        }

        if let Some(namespace) = config.namespace {
            settings_builder.namespace(Some(namespace));
        }

        let settings = settings_builder.build().map_err(|e| {
            SecretsError::config_error(format!("Invalid Vault configuration: {}", e))
        })?;

        let client = VaultClient::new(settings).map_err(|e| {
            SecretsError::config_error(format!("Failed to create Vault client: {}", e))
        })?;

        tracing::debug!(address = %config.address, mount_path = %config.mount_path, "Initialized Vault KV client");

        Ok(Self { client, address: config.address, mount_path: config.mount_path })
    }
}

fn encode_payload(data: &Map<String, Value>) -> Result<Vec<u8>> {
    serde_json::to_vec(data)
        .map_err(|e| SecretsError::backend_unavailable(format!("Failed to encode payload: {}", e)))
}

fn classify(error: ClientError, path: &str) -> SecretsError {
    match error {
        ClientError::APIError { code: 404, .. } => SecretsError::not_found(path),
        other => SecretsError::backend_unavailable(other.to_string()),
    }
}

#[async_trait]
impl RemoteSecretClient for VaultKvClient {
    async fn fetch_raw(&self, path: &str) -> Result<Vec<u8>> {
        let data: Map<String, Value> =
            kv2::read(&self.client, &self.mount_path, path).await.map_err(|e| {
                tracing::warn!(error = %e, path = %path, mount_path = %self.mount_path, "Failed to read secret from Vault");
                classify(e, path)
            })?;

        encode_payload(&data)
    }

    async fn health_check(&self) -> Result<()> {
        match vaultrs::sys::health(&self.client).await {
            Ok(_) => {
                tracing::info!(address = %self.address, "Successfully connected to Vault");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, address = %self.address, "Failed to connect to Vault");
                Err(SecretsError::backend_unavailable(format!("Vault health check failed: {}", e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_vault_config_default() {
        let config = VaultConfig::default();
        assert_eq!(config.address, "http://127.0.0.1:8200");
        assert_eq!(config.mount_path, "secret");
        assert!(config.token.is_none());
        assert!(config.namespace.is_none());
    }

    #[test]
    fn test_vault_config_deserializes_with_defaults() {
        let config: VaultConfig =
            serde_json::from_value(json!({"address": "https://vault.internal:8200", "token": "s.abc"}))
                .unwrap();
        assert_eq!(config.mount_path, "secret");
        assert_eq!(config.token.as_ref().map(|t| t.expose_secret()), Some("s.abc"));
        assert!(!format!("{:?}", config).contains("s.abc"));
    }

    #[test]
    fn test_empty_address_rejected() {
        let config = VaultConfig { address: String::new(), ..Default::default() };
        assert!(matches!(VaultKvClient::new(config), Err(SecretsError::Config { .. })));
    }

    #[test]
    fn test_client_debug_hides_internals() {
        let client = VaultKvClient::new(VaultConfig {
            token: Some(SecretString::new("s.hidden")),
            ..Default::default()
        })
        .unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("secret"));
        assert!(!debug.contains("s.hidden"));
    }

    #[test]
    fn test_encode_structured_payload() {
        let raw =
            encode_payload(&object(json!({"ApiKey": "k", "TimeoutSeconds": 30}))).unwrap();
        let decoded: Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(decoded, json!({"ApiKey": "k", "TimeoutSeconds": 30}));
    }

    #[test]
    fn test_encode_keeps_single_value_object() {
        let raw = encode_payload(&object(json!({"value": "postgres://app@db/app"}))).unwrap();
        let decoded: Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(decoded, json!({"value": "postgres://app@db/app"}));
    }

    #[test]
    fn test_classify_not_found() {
        let err = classify(ClientError::APIError { code: 404, errors: vec![] }, "MySecrets");
        assert!(matches!(err, SecretsError::NotFound { .. }));

        let err = classify(
            ClientError::APIError { code: 503, errors: vec!["sealed".to_string()] },
            "MySecrets",
        );
        assert!(matches!(err, SecretsError::BackendUnavailable { .. }));
    }
}
