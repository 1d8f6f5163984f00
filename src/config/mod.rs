//! # Configuration Management
//!
//! Configuration is loaded once at startup from three layers, later layers
//! overriding earlier ones:
//!
//! 1. `<config_dir>/appsettings.json` (optional)
//! 2. `<config_dir>/appsettings.<Environment>.json` (required in Development)
//! 3. Environment variables prefixed `STRATUS__`, e.g. `STRATUS__SERVER__PORT=9000`
//!
//! Environment variables are lower-cased on the way in. When a variable names
//! a key that a file already spells differently (`STRATUS__CONNECTIONSTRINGS__DEFAULTCONNECTION`
//! against `ConnectionStrings.DefaultConnection`), it also overrides the key
//! under the file's spelling.
//!
//! The merged store is kept as-is for the local secret provider, and the
//! lower-case host sections are bound into [`AppSettings`].

mod keys;
mod settings;

pub(crate) use keys::resolve_path;

pub use settings::{AppSettings, DatabaseConfig, LoggingConfig, SecretsConfig, ServerConfig};

use crate::errors::{Error, Result};
use crate::secrets::ProviderMode;
use config::{Config, Environment, File, FileFormat};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "STRATUS";

/// Environment variable naming the host environment
pub const ENVIRONMENT_VAR: &str = "STRATUS_ENVIRONMENT";

/// The host environment the process runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEnvironment {
    Development,
    Staging,
    Production,
    Custom(String),
}

impl HostEnvironment {
    /// Case-insensitive; blank input means Production.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        match name.to_ascii_lowercase().as_str() {
            "development" => Self::Development,
            "staging" => Self::Staging,
            "production" | "" => Self::Production,
            _ => Self::Custom(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "Development",
            Self::Staging => "Staging",
            Self::Production => "Production",
            Self::Custom(name) => name,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Only Development reads secrets from local configuration.
    pub fn provider_mode(&self) -> ProviderMode {
        if self.is_development() {
            ProviderMode::LocalConfig
        } else {
            ProviderMode::Remote
        }
    }
}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self::Production
    }
}

impl fmt::Display for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostEnvironment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Where and for which environment configuration is loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub config_dir: PathBuf,
    pub environment: HostEnvironment,
}

impl LoadOptions {
    pub fn new(config_dir: impl Into<PathBuf>, environment: HostEnvironment) -> Self {
        Self { config_dir: config_dir.into(), environment }
    }
}

/// Loaded configuration: the merged store plus the validated host settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: HostEnvironment,
    pub settings: AppSettings,
    store: Arc<Config>,
}

impl AppConfig {
    /// Loads and validates configuration for `options.environment`.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if a required file is missing or a source is malformed
    /// - [`Error::Validation`] if the host settings are out of range
    pub fn load(options: &LoadOptions) -> Result<Self> {
        let base_file = options.config_dir.join("appsettings.json");
        let env_file =
            options.config_dir.join(format!("appsettings.{}.json", options.environment.as_str()));

        let env_file_required = options.environment.is_development();
        if env_file_required && !env_file.is_file() {
            return Err(Error::config(format!(
                "Required configuration file not found: {}",
                env_file.display()
            )));
        }

        let files = Config::builder()
            .add_source(File::new(&path_str(&base_file), FileFormat::Json).required(false))
            .add_source(
                File::new(&path_str(&env_file), FileFormat::Json).required(env_file_required),
            )
            .build()?;
        let tree: serde_json::Value = files.clone().try_deserialize()?;

        let mut builder = Config::builder().add_source(files).add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );
        for (key, value) in cased_env_overrides(&tree, std::env::vars()) {
            builder = builder.set_override(key, value)?;
        }
        let store = builder.build()?;

        tracing::debug!(
            environment = %options.environment,
            config_dir = %options.config_dir.display(),
            "Loaded configuration sources"
        );

        Self::from_store(options.environment.clone(), store)
    }

    /// Binds and validates host settings from an already-built store.
    pub fn from_store(environment: HostEnvironment, store: Config) -> Result<Self> {
        let settings: AppSettings = store.clone().try_deserialize()?;
        settings.validate()?;

        Ok(Self { environment, settings, store: Arc::new(store) })
    }

    /// The merged configuration store, shared with the local secret provider.
    pub fn store(&self) -> Arc<Config> {
        Arc::clone(&self.store)
    }

    pub fn provider_mode(&self) -> ProviderMode {
        self.environment.provider_mode()
    }
}

/// `STRATUS__*` variables whose path matches a file key spelled in another
/// case, keyed by the file's spelling.
fn cased_env_overrides(
    tree: &serde_json::Value,
    vars: impl Iterator<Item = (String, String)>,
) -> Vec<(String, String)> {
    let prefix = format!("{}__", ENV_PREFIX);
    vars.filter_map(|(name, value)| {
        let rest = name.strip_prefix(&prefix)?;
        let segments: Vec<String> = rest.split("__").map(str::to_lowercase).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        let cased = keys::stored_spelling(tree, &segments);
        (cased != segments).then(|| (cased.join("."), value))
    })
    .collect()
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
