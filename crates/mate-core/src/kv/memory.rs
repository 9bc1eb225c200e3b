//! In-memory key-value backend

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyValueStore, StoreResult};

/// Process-local store, used in tests and by an ephemeral relay.
///
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no keys
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> StoreResult<HashMap<String, String>> {
        let entries = self.entries.read().await;
        Ok(keys
            .iter()
            .filter_map(|key| {
                entries
                    .get(*key)
                    .map(|value| ((*key).to_string(), value.clone()))
            })
            .collect())
    }

    async fn set(&self, entries: Vec<(String, String)>) -> StoreResult<()> {
        let mut guard = self.entries.write().await;
        guard.extend(entries);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> StoreResult<()> {
        let mut guard = self.entries.write().await;
        for key in keys {
            guard.remove(*key);
        }
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}
