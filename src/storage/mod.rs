//! # Storage and Persistence
//!
//! Database connectivity for the stratus service. The pool is built from the
//! `DefaultConnection` connection string resolved at startup.

pub mod pool;

pub use crate::config::DatabaseConfig;

pub use pool::{create_pool, ping, DbPool};
