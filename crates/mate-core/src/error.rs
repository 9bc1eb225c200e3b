//! Error types for mate-core

use thiserror::Error;

use crate::kv::StoreError;

/// Result type alias using mate-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mate-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Key-value backend failure
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Malformed note or prompt
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Another live prompt already owns the key
    #[error("Prompt key already exists: {0}")]
    DuplicateKey(String),

    /// Entity not found (or tombstoned)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build a validation error from a list of per-field messages.
    pub fn validation(messages: &[String]) -> Self {
        Self::Validation(messages.join("; "))
    }
}
