//! Demonstrates consuming the secret provider without knowing its variant.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::secrets::{Result, SecretProvider, SecretString};

/// Secret path holding [`ApiSettings`]
pub const API_SETTINGS_PATH: &str = "MySecrets";

/// Connection string used by the application database
pub const DEFAULT_CONNECTION: &str = "DefaultConnection";

/// Settings for an outbound API, stored as a structured secret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiSettings {
    pub api_key: SecretString,
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Service that resolves its settings through the active secret provider
#[derive(Debug, Clone)]
pub struct SecretsDemoService {
    provider: Arc<SecretProvider>,
}

impl SecretsDemoService {
    pub fn new(provider: Arc<SecretProvider>) -> Self {
        Self { provider }
    }

    /// Resolves the `MySecrets` secret.
    pub async fn get_api_settings(&self) -> Result<ApiSettings> {
        self.provider.get_secret::<ApiSettings>(API_SETTINGS_PATH).await
    }

    /// Resolves the `DefaultConnection` connection string.
    pub async fn get_db_connection(&self) -> Result<SecretString> {
        self.provider.get_connection_string(DEFAULT_CONNECTION).await
    }
}
