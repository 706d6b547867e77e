//! Error types for table file operations.

use simopt_core::TableError;
use thiserror::Error;

/// Errors that can occur while loading or saving table files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File extension is neither YAML nor JSON.
    #[error("unsupported table file format: {0}")]
    UnsupportedFormat(String),

    /// The declarations do not form a valid option table.
    #[error("invalid option table: {0}")]
    Table(#[from] TableError),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
