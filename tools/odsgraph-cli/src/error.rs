//! Error types for the CLI.

use thiserror::Error;

/// CLI-specific result type.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
pub enum CliError {
    /// Model cache error.
    #[error("cache error: {0}")]
    Cache(#[from] odsgraph_cache::CacheError),

    /// Base model lookup error.
    #[error("{0}")]
    Core(#[from] odsgraph_core::CoreError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
