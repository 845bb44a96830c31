//! Shared library for the anime-sheets tools.
//!
//! This crate provides common functionality used by the binary crate:
//! - Configuration management
//! - Catalog record models
//! - Retry with exponential backoff
//! - File path utilities
//! - Logging infrastructure

pub mod config;
pub mod logging;
pub mod models;
pub mod paths;
pub mod retry;

// Re-export commonly used types
pub use config::Config;
pub use logging::LogConfig;
pub use models::*;
pub use paths::DataPaths;
pub use retry::{try_with_exponential_backoff, Backoff, RetryError};

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
