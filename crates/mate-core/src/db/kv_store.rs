//! libSQL implementation of `KeyValueStore`

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::Database;
use crate::kv::{KeyValueStore, StoreResult};

/// Area holding the note/prompt/settings blobs
pub const LOCAL_AREA: &str = "local";

/// Key-value store persisted in a libSQL table, scoped to one area.
///
/// Areas sharing a database file are independent namespaces; clearing one
/// leaves the others untouched.
#[derive(Clone)]
pub struct LibSqlStore {
    db: Arc<Mutex<Database>>,
    area: String,
}

impl LibSqlStore {
    /// Open (or create) a database file and scope the store to the local area
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::open(path).await?;
        Ok(Self::from_database(db))
    }

    /// Open an in-memory database (useful for testing)
    pub async fn open_in_memory() -> StoreResult<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self::from_database(db))
    }

    fn from_database(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            area: LOCAL_AREA.to_string(),
        }
    }

    /// Another store over the same database, scoped to `area`
    #[must_use]
    pub fn area(&self, area: impl Into<String>) -> Self {
        Self {
            db: Arc::clone(&self.db),
            area: area.into(),
        }
    }

    /// Name of the area this store reads and writes
    pub fn area_name(&self) -> &str {
        &self.area
    }
}

#[async_trait]
impl KeyValueStore for LibSqlStore {
    async fn get(&self, keys: &[&str]) -> StoreResult<HashMap<String, String>> {
        let db = self.db.lock().await;
        let mut values = HashMap::with_capacity(keys.len());

        for key in keys {
            let mut rows = db
                .connection()
                .query(
                    "SELECT value FROM kv_entries WHERE area = ?1 AND key = ?2",
                    [self.area.as_str(), *key],
                )
                .await?;
            if let Some(row) = rows.next().await? {
                values.insert((*key).to_string(), row.get::<String>(0)?);
            }
        }

        Ok(values)
    }

    async fn set(&self, entries: Vec<(String, String)>) -> StoreResult<()> {
        let db = self.db.lock().await;
        let conn = db.connection();
        let now = chrono::Utc::now().timestamp_millis();

        conn.execute("BEGIN TRANSACTION", ()).await?;
        for (key, value) in &entries {
            let result = conn
                .execute(
                    "INSERT INTO kv_entries (area, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(area, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                    libsql::params![self.area.as_str(), key.as_str(), value.as_str(), now],
                )
                .await;
            if let Err(e) = result {
                conn.execute("ROLLBACK", ()).await.ok();
                return Err(e.into());
            }
        }
        if let Err(e) = conn.execute("COMMIT", ()).await {
            conn.execute("ROLLBACK", ()).await.ok();
            return Err(e.into());
        }

        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> StoreResult<()> {
        let db = self.db.lock().await;
        for key in keys {
            db.connection()
                .execute(
                    "DELETE FROM kv_entries WHERE area = ?1 AND key = ?2",
                    [self.area.as_str(), *key],
                )
                .await?;
        }
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        let db = self.db.lock().await;
        db.connection()
            .execute(
                "DELETE FROM kv_entries WHERE area = ?1",
                [self.area.as_str()],
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_set_and_get() {
        let store = LibSqlStore::open_in_memory().await.unwrap();
        store
            .set(vec![
                ("notes".to_string(), "[]".to_string()),
                ("settings".to_string(), "{}".to_string()),
            ])
            .await
            .unwrap();

        let values = store.get(&["notes", "settings", "prompts"]).await.unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values["notes"], "[]");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_set_overwrites() {
        let store = LibSqlStore::open_in_memory().await.unwrap();
        store.set_one("k", "1".to_string()).await.unwrap();
        store.set_one("k", "2".to_string()).await.unwrap();
        assert_eq!(store.get_one("k").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_areas_are_isolated() {
        let local = LibSqlStore::open_in_memory().await.unwrap();
        let sync = local.area("sync");

        local.set_one("k", "local".to_string()).await.unwrap();
        sync.set_one("k", "sync".to_string()).await.unwrap();

        sync.clear().await.unwrap();
        assert_eq!(sync.get_one("k").await.unwrap(), None);
        assert_eq!(local.get_one("k").await.unwrap().as_deref(), Some("local"));

        local.remove(&["k"]).await.unwrap();
        assert_eq!(local.get_one("k").await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_values_persist_across_reopen() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("mate.db");
        {
            let store = LibSqlStore::open(&path).await.unwrap();
            store.set_one("k", "v".to_string()).await.unwrap();
        }

        let reopened = LibSqlStore::open(&path).await.unwrap();
        assert_eq!(reopened.get_one("k").await.unwrap().as_deref(), Some("v"));
    }
}
