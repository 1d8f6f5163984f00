//! Business logic services
//!
//! This module contains service layer components that consume secrets,
//! separated from HTTP concerns.

pub mod secrets_demo;

pub use secrets_demo::{ApiSettings, SecretsDemoService};
