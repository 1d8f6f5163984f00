//! Error types for secret resolution.

use thiserror::Error;

/// Result type for secret lookups.
pub type Result<T> = std::result::Result<T, SecretsError>;

/// Errors that can occur while resolving a secret.
///
/// Messages never contain secret values, only keys, paths and backend
/// diagnostics.
#[derive(Error, Debug)]
pub enum SecretsError {
    /// The key or path is absent (or empty) in the backing store.
    #[error("Secret not found: {key}")]
    NotFound { key: String },

    /// The retrieved payload does not match the requested shape.
    #[error("Failed to deserialize secret '{path}': {message}")]
    Deserialization { path: String, message: String },

    /// The remote backend could not be reached or rejected the request.
    #[error("Secret backend unavailable: {message}")]
    BackendUnavailable { message: String },

    /// The caller cancelled the lookup before it completed.
    #[error("Secret lookup cancelled: {operation}")]
    Cancelled { operation: String },

    /// The key was rejected before any store was consulted.
    #[error("Invalid secret key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// The provider could not be constructed.
    #[error("Secret provider configuration error: {message}")]
    Config { message: String },
}

impl SecretsError {
    /// Create a not found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a deserialization error.
    pub fn deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Deserialization { path: path.into(), message: message.into() }
    }

    /// Create a backend unavailable error.
    pub fn backend_unavailable(message: impl Into<String>) -> Self {
        Self::BackendUnavailable { message: message.into() }
    }

    /// Create a cancelled error.
    pub fn cancelled(operation: impl Into<String>) -> Self {
        Self::Cancelled { operation: operation.into() }
    }

    /// Create an invalid key error.
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into(), reason: reason.into() }
    }

    /// Create a config error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Whether the caller can reasonably fall back to a default.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
