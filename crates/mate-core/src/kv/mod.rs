//! Key-value storage seam
//!
//! Everything Mate persists goes through [`KeyValueStore`]: an asynchronous
//! string-to-string map with no cross-call transactions. Values are JSON
//! documents encoded by the layer above.

mod memory;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryStore;

/// Errors raised by key-value backends
#[derive(Debug, Error)]
pub enum StoreError {
    /// Generic backend failure
    #[error("{0}")]
    Backend(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Asynchronous key-value storage.
///
/// Each call is atomic on its own; nothing is atomic across calls.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the values stored under `keys`; missing keys are absent from the map
    async fn get(&self, keys: &[&str]) -> StoreResult<HashMap<String, String>>;

    /// Upsert every entry
    async fn set(&self, entries: Vec<(String, String)>) -> StoreResult<()>;

    /// Remove the given keys; missing keys are ignored
    async fn remove(&self, keys: &[&str]) -> StoreResult<()>;

    /// Remove every key
    async fn clear(&self) -> StoreResult<()>;

    /// Fetch a single value
    async fn get_one(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.get(&[key]).await?.remove(key))
    }

    /// Upsert a single value
    async fn set_one(&self, key: &str, value: String) -> StoreResult<()> {
        self.set(vec![(key.to_string(), value)]).await
    }
}
