//! Integration tests for the secret provider facade
//!
//! Covers both variants through the public API: the local configuration
//! provider against in-memory stores, and the remote provider against a
//! scripted client.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use config::{Config, File, FileFormat};
use proptest::prelude::*;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use stratus::config::{AppConfig, HostEnvironment, SecretsConfig};
use stratus::secrets::{
    ConfigFileProvider, ProviderFactory, ProviderMode, RemoteSecretClient, SecretProvider,
    SecretsError,
};
use stratus::services::{ApiSettings, SecretsDemoService};
use tokio_util::sync::CancellationToken;

fn store(json: &str) -> Arc<Config> {
    Arc::new(Config::builder().add_source(File::from_str(json, FileFormat::Json)).build().unwrap())
}

fn local_provider(json: &str) -> SecretProvider {
    SecretProvider::LocalConfig(ConfigFileProvider::new(store(json)))
}

/// Remote client answering from a fixed map of path to payload.
#[derive(Debug, Default)]
struct ScriptedClient {
    payloads: HashMap<String, Vec<u8>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn with(mut self, path: &str, payload: &[u8]) -> Self {
        self.payloads.insert(path.to_string(), payload.to_vec());
        self
    }
}

#[async_trait]
impl RemoteSecretClient for ScriptedClient {
    async fn fetch_raw(&self, path: &str) -> stratus::secrets::Result<Vec<u8>> {
        self.calls.lock().unwrap().push(path.to_string());
        self.payloads.get(path).cloned().ok_or_else(|| SecretsError::not_found(path))
    }
}

fn remote_provider(client: ScriptedClient) -> SecretProvider {
    ProviderFactory::remote(Arc::new(client), &SecretsConfig::default())
}

#[tokio::test]
async fn test_local_default_connection_scenario() {
    let provider = local_provider(
        r#"{"ConnectionStrings": {"DefaultConnection": "Server=local;Database=app"}}"#,
    );

    let value = provider.get_connection_string("DefaultConnection").await.unwrap();
    assert_eq!(value.expose_secret(), "Server=local;Database=app");
}

#[tokio::test]
async fn test_local_missing_section_scenario() {
    let provider = local_provider(r#"{"ConnectionStrings": {"DefaultConnection": "x"}}"#);

    let result = provider.get_secret::<ApiSettings>("MySecrets").await;
    assert!(matches!(result, Err(SecretsError::NotFound { .. })));
}

#[tokio::test]
async fn test_local_missing_connection_string_is_not_empty_success() {
    let provider = local_provider(r#"{"ConnectionStrings": {}}"#);

    let result = provider.get_connection_string("DefaultConnection").await;
    assert!(matches!(result, Err(SecretsError::NotFound { .. })));
}

#[tokio::test]
async fn test_local_mistyped_section_is_deserialization_error() {
    let provider = local_provider(
        r#"{"MySecrets": {"ApiKey": "k", "BaseUrl": "http://svc", "TimeoutSeconds": "soon"}}"#,
    );

    let result = provider.get_secret::<ApiSettings>("MySecrets").await;
    assert!(matches!(result, Err(SecretsError::Deserialization { .. })));
}

#[tokio::test]
async fn test_remote_malformed_payload_scenario() {
    let provider = remote_provider(ScriptedClient::default().with("MySecrets", b"not json"));

    let result = provider.get_secret::<ApiSettings>("MySecrets").await;
    assert!(matches!(result, Err(SecretsError::Deserialization { .. })));
}

#[tokio::test]
async fn test_remote_resolves_both_secrets() {
    let provider = remote_provider(
        ScriptedClient::default()
            .with("ConnectionStrings/DefaultConnection", b"postgres://app@db/app")
            .with(
                "MySecrets",
                br#"{"ApiKey": "prod-key", "BaseUrl": "https://api.example.com", "TimeoutSeconds": 5}"#,
            ),
    );
    let demo = SecretsDemoService::new(Arc::new(provider));

    assert_eq!(demo.get_db_connection().await.unwrap().expose_secret(), "postgres://app@db/app");

    let settings = demo.get_api_settings().await.unwrap();
    assert_eq!(settings.api_key.expose_secret(), "prod-key");
    assert_eq!(settings.timeout_seconds, 5);
}

#[tokio::test]
async fn test_remote_unreachable_scenario() {
    let store = Config::builder()
        .add_source(File::from_str(
            r#"{"vault": {"address": "http://127.0.0.1:1", "token": "s.unused"}}"#,
            FileFormat::Json,
        ))
        .build()
        .unwrap();
    let config = AppConfig::from_store(HostEnvironment::Production, store).unwrap();
    let provider = ProviderFactory::create(config.provider_mode(), &config).unwrap();

    let result = provider.get_connection_string("DefaultConnection").await;
    assert!(matches!(result, Err(SecretsError::BackendUnavailable { .. })));

    let health = provider.health_check().await;
    assert!(matches!(health, Err(SecretsError::BackendUnavailable { .. })));
}

#[tokio::test]
async fn test_cancellation_wins_over_lookup() {
    let provider = remote_provider(ScriptedClient::default());
    let token = CancellationToken::new();
    token.cancel();

    let result = provider.get_connection_string_with("DefaultConnection", &token).await;
    assert!(matches!(result, Err(SecretsError::Cancelled { .. })));
}

#[test]
fn test_factory_is_deterministic_per_mode() {
    let store = Config::builder()
        .add_source(File::from_str(
            r#"{
                "vault": {"address": "http://127.0.0.1:8200", "token": "s.test"},
                "ConnectionStrings": {"DefaultConnection": "sqlite::memory:"}
            }"#,
            FileFormat::Json,
        ))
        .build()
        .unwrap();
    let config = AppConfig::from_store(HostEnvironment::Development, store).unwrap();

    for mode in [ProviderMode::LocalConfig, ProviderMode::Remote] {
        let first = ProviderFactory::create(mode, &config).unwrap();
        let second = ProviderFactory::create(mode, &config).unwrap();
        assert_eq!(first.mode(), mode);
        assert_eq!(second.mode(), mode);
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
struct Upstream {
    base_url: String,
    retries: u32,
}

fn key_strategy() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z0-9]{0,15}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9=;/_-]{1,40}"
}

proptest! {
    #[test]
    fn prop_present_connection_strings_round_trip(
        entries in proptest::collection::hash_map(key_strategy(), value_strategy(), 1..8)
    ) {
        let section: Map<String, Value> =
            entries.iter().map(|(k, v)| (k.clone(), Value::String(v.clone()))).collect();
        let provider = ConfigFileProvider::new(store(&json!({"ConnectionStrings": section}).to_string()));

        for (key, value) in &entries {
            let resolved = provider.get_connection_string(key).unwrap();
            prop_assert_eq!(resolved.expose_secret(), value.as_str());
        }
    }

    #[test]
    fn prop_absent_connection_strings_are_not_found(
        present in key_strategy(),
        absent in key_strategy(),
    ) {
        prop_assume!(!present.eq_ignore_ascii_case(&absent));
        let provider = ConfigFileProvider::new(store(
            &json!({"ConnectionStrings": {present: "value"}}).to_string(),
        ));

        let is_not_found =
            matches!(provider.get_connection_string(&absent), Err(SecretsError::NotFound { .. }));
        prop_assert!(is_not_found);
    }

    #[test]
    fn prop_typed_secret_matches_manual_bind(
        section in key_strategy(),
        base_url in value_strategy(),
        retries in 0u32..1000,
    ) {
        let config = store(
            &json!({section.clone(): {"BaseUrl": base_url, "Retries": retries}}).to_string(),
        );
        let provider = ConfigFileProvider::new(Arc::clone(&config));

        let via_provider: Upstream = provider.get_secret(&section).unwrap();
        let manual: Upstream = config.get(&section).unwrap();
        prop_assert_eq!(via_provider, manual);
    }
}
