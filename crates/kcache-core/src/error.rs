//! Error types for kcache-core.
//!
//! Nothing in the cache is fatal to a caller. Missing ids are reported as
//! `bool`/`Option` results and never as an error. Unreadable tier files
//! degrade to empty tiers, and only the write that actually failed returns an
//! `Err`.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigValidationError;

/// Result type alias using kcache-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for cache operations
#[derive(Error, Debug)]
pub enum Error {
    /// Rejected at the boundary, before any I/O
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Tier file exists but could not be decoded
    #[error("storage unreadable at {}: {message}", .path.display())]
    StorageUnreadable { path: PathBuf, message: String },

    /// Tier directory or file could not be created or replaced
    #[error("storage unwritable at {}: {source}", .path.display())]
    StorageUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigValidationError),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an unwritable storage error for `path`
    pub fn unwritable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StorageUnwritable {
            path: path.into(),
            source,
        }
    }

    /// Check if this error came from rejected input
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::Config(_))
    }
}
