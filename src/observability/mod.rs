//! # Observability Infrastructure
//!
//! Structured logging and HTTP request tracing for the stratus service.

pub mod http_tracing;
pub mod logging;

pub use http_tracing::trace_http_requests;
pub use logging::{init_logging, log_config_info};
