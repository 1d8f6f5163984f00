//! Secret lookups against the hierarchical configuration loaded at startup.
//!
//! This is the development variant. Connection strings are leaf strings under
//! the `ConnectionStrings` section and typed secrets are whole sections bound
//! into the caller's type:
//!
//! ```json
//! {
//!   "ConnectionStrings": { "DefaultConnection": "sqlite://stratus.db?mode=rwc" },
//!   "MySecrets": { "ApiKey": "dev-key", "BaseUrl": "http://localhost:5005", "TimeoutSeconds": 30 }
//! }
//! ```
//!
//! Keys match case-insensitively, so `defaultconnection` finds
//! `DefaultConnection`. When two keys differ only by case the exact spelling
//! wins.
//!
//! Every lookup is an in-memory read; this variant never reports
//! [`SecretsError::BackendUnavailable`].

use std::sync::Arc;

use config::{Config, ConfigError};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::resolve_path;

use super::error::{Result, SecretsError};
use super::types::{SecretKey, SecretString};

/// Section holding connection strings when nothing else is configured.
pub const DEFAULT_CONNECTION_STRINGS_SECTION: &str = "ConnectionStrings";

/// Reads secrets from an already-loaded [`config::Config`].
#[derive(Debug, Clone)]
pub struct ConfigFileProvider {
    store: Arc<Config>,
    connection_strings_section: String,
}

impl ConfigFileProvider {
    pub fn new(store: Arc<Config>) -> Self {
        Self::with_connection_strings_section(store, DEFAULT_CONNECTION_STRINGS_SECTION)
    }

    pub fn with_connection_strings_section(store: Arc<Config>, section: impl Into<String>) -> Self {
        let section: String = section.into();
        Self { store, connection_strings_section: section.replace(['/', ':'], ".") }
    }

    /// Returns the value configured at `ConnectionStrings.<key>`.
    ///
    /// Numeric and boolean leaves are returned in their textual form. A
    /// missing, null or empty value is [`SecretsError::NotFound`].
    pub fn get_connection_string(&self, key: &str) -> Result<SecretString> {
        let key = SecretKey::parse(key)?;
        let path = self.resolve(
            &format!("{}.{}", self.connection_strings_section, key.to_config_path()),
            &key,
        )?;

        match self.lookup(&path, &key)? {
            Value::String(value) => Ok(SecretString::new(value)),
            Value::Number(number) => Ok(SecretString::new(number.to_string())),
            Value::Bool(flag) => Ok(SecretString::new(flag.to_string())),
            Value::Object(_) | Value::Array(_) => Err(SecretsError::deserialization(
                path,
                "expected a string value, found a section",
            )),
            // lookup() filters null
            Value::Null => Err(SecretsError::not_found(key.as_str())),
        }
    }

    /// Binds the section at `path` into `T`.
    ///
    /// The bind goes through the configuration store's own deserializer, so
    /// the result is identical to calling `Config::get::<T>(path)` directly.
    /// A section that lacks required fields or has mistyped values is a
    /// [`SecretsError::Deserialization`] error.
    pub fn get_secret<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let key = SecretKey::parse(path)?;
        let config_path = self.resolve(&key.to_config_path(), &key)?;

        self.lookup(&config_path, &key)?;

        self.store
            .get::<T>(&config_path)
            .map_err(|e| SecretsError::deserialization(key.as_str(), e.to_string()))
    }

    /// Maps a dotted path onto the store's own spelling of it.
    fn resolve(&self, path: &str, key: &SecretKey) -> Result<String> {
        let tree: Value = Config::clone(&self.store)
            .try_deserialize()
            .map_err(|e| SecretsError::deserialization(key.as_str(), e.to_string()))?;
        let segments: Vec<&str> = path.split('.').collect();

        resolve_path(&tree, &segments)
            .map(|stored| stored.join("."))
            .ok_or_else(|| SecretsError::not_found(key.as_str()))
    }

    /// Fetches the raw value at `path`, treating absent and empty values alike.
    fn lookup(&self, path: &str, key: &SecretKey) -> Result<Value> {
        let value = match self.store.get::<Value>(path) {
            Ok(value) => value,
            Err(ConfigError::NotFound(_)) => return Err(SecretsError::not_found(key.as_str())),
            Err(e) => return Err(SecretsError::deserialization(key.as_str(), e.to_string())),
        };

        if is_empty(&value) {
            return Err(SecretsError::not_found(key.as_str()));
        }

        Ok(value)
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Number(_) | Value::Bool(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct Upstream {
        base_url: String,
        retries: u32,
    }

    fn provider(json: &str) -> ConfigFileProvider {
        let store = Config::builder()
            .add_source(File::from_str(json, FileFormat::Json))
            .build()
            .expect("build config");
        ConfigFileProvider::new(Arc::new(store))
    }

    #[test]
    fn test_connection_string_present() {
        let provider = provider(r#"{"ConnectionStrings": {"Reporting": "postgres://reports"}}"#);
        let value = provider.get_connection_string("Reporting").unwrap();
        assert_eq!(value.expose_secret(), "postgres://reports");
    }

    #[test]
    fn test_connection_string_empty_is_not_found() {
        let provider = provider(r#"{"ConnectionStrings": {"Reporting": "", "Audit": null}}"#);
        assert!(matches!(
            provider.get_connection_string("Reporting"),
            Err(SecretsError::NotFound { .. })
        ));
        assert!(matches!(
            provider.get_connection_string("Audit"),
            Err(SecretsError::NotFound { .. })
        ));
    }

    #[test]
    fn test_connection_string_section_is_not_a_string() {
        let provider = provider(r#"{"ConnectionStrings": {"Reporting": {"Primary": "x"}}}"#);
        assert!(matches!(
            provider.get_connection_string("Reporting"),
            Err(SecretsError::Deserialization { .. })
        ));
        // A nested leaf is still reachable with either separator
        assert_eq!(provider.get_connection_string("Reporting:Primary").unwrap().expose_secret(), "x");
        assert_eq!(provider.get_connection_string("Reporting.Primary").unwrap().expose_secret(), "x");
    }

    #[test]
    fn test_custom_connection_strings_section() {
        let store = Config::builder()
            .add_source(File::from_str(r#"{"Databases": {"Main": "sqlite::memory:"}}"#, FileFormat::Json))
            .build()
            .unwrap();
        let provider = ConfigFileProvider::with_connection_strings_section(Arc::new(store), "Databases");
        assert_eq!(provider.get_connection_string("Main").unwrap().expose_secret(), "sqlite::memory:");
    }

    #[test]
    fn test_keys_match_case_insensitively() {
        let provider = provider(
            r#"{
                "ConnectionStrings": {"DefaultConnection": "Server=local;Database=app"},
                "Upstream": {"BaseUrl": "http://svc", "Retries": 3}
            }"#,
        );

        let value = provider.get_connection_string("defaultconnection").unwrap();
        assert_eq!(value.expose_secret(), "Server=local;Database=app");
        let value = provider.get_connection_string("DEFAULTCONNECTION").unwrap();
        assert_eq!(value.expose_secret(), "Server=local;Database=app");

        let upstream: Upstream = provider.get_secret("upstream").unwrap();
        assert_eq!(upstream.retries, 3);
    }

    #[test]
    fn test_exact_spelling_wins_over_case_variant() {
        let provider = provider(
            r#"{
                "ConnectionStrings": {"Main": "files"},
                "connectionstrings": {"main": "env", "extra": "env-only"}
            }"#,
        );

        assert_eq!(provider.get_connection_string("Main").unwrap().expose_secret(), "files");
        assert_eq!(provider.get_connection_string("Extra").unwrap().expose_secret(), "env-only");
    }

    #[test]
    fn test_blank_key_rejected() {
        let provider = provider("{}");
        assert!(matches!(provider.get_connection_string(" "), Err(SecretsError::InvalidKey { .. })));
        assert!(matches!(provider.get_secret::<Upstream>(""), Err(SecretsError::InvalidKey { .. })));
    }

    #[test]
    fn test_secret_section_binds() {
        let provider = provider(r#"{"Upstream": {"BaseUrl": "http://svc", "Retries": 3}}"#);
        let upstream: Upstream = provider.get_secret("Upstream").unwrap();
        assert_eq!(upstream, Upstream { base_url: "http://svc".to_string(), retries: 3 });
    }

    #[test]
    fn test_secret_section_missing_field() {
        let provider = provider(r#"{"Upstream": {"BaseUrl": "http://svc"}}"#);
        assert!(matches!(
            provider.get_secret::<Upstream>("Upstream"),
            Err(SecretsError::Deserialization { .. })
        ));
    }

    #[test]
    fn test_secret_section_empty_is_not_found() {
        let provider = provider(r#"{"Upstream": {}}"#);
        assert!(matches!(
            provider.get_secret::<Upstream>("Upstream"),
            Err(SecretsError::NotFound { .. })
        ));
    }
}
