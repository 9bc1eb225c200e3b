#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mate_core::kv::{KeyValueStore, MemoryStore, StoreError, StoreResult};
use mate_core::sync::SyncConfigUpdate;
use mate_core::util::Clock;
use mate_core::{SyncService, TombstoneStore};
use mate_relay::{app_router, AppState, RelayConfig};

pub const TOKEN: &str = "test-token-0123456789";

pub struct Relay {
    pub url: String,
    pub snapshots: MemoryStore,
}

/// Start the relay on an ephemeral port backed by an in-memory map
pub async fn spawn_relay() -> Relay {
    let snapshots = MemoryStore::new();
    let url = serve(Arc::new(snapshots.clone())).await;
    Relay { url, snapshots }
}

/// Start the relay over `snapshots` and return its base URL
pub async fn serve(snapshots: Arc<dyn KeyValueStore>) -> String {
    let state = AppState::new(Arc::new(RelayConfig::default()), snapshots)
        .with_clock(Arc::new(|| 1_000_000));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app_router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

/// Snapshot map whose reads or writes fail with a backend error
#[derive(Clone, Default)]
pub struct BrokenStore {
    pub inner: MemoryStore,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl BrokenStore {
    fn backend_down() -> StoreError {
        StoreError::Backend("disk full".to_string())
    }
}

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, keys: &[&str]) -> StoreResult<HashMap<String, String>> {
        if self.fail_reads {
            return Err(Self::backend_down());
        }
        self.inner.get(keys).await
    }

    async fn set(&self, entries: Vec<(String, String)>) -> StoreResult<()> {
        if self.fail_writes {
            return Err(Self::backend_down());
        }
        self.inner.set(entries).await
    }

    async fn remove(&self, keys: &[&str]) -> StoreResult<()> {
        self.inner.remove(keys).await
    }

    async fn clear(&self) -> StoreResult<()> {
        self.inner.clear().await
    }
}

/// A device: its own local store, its own clock, pointed at the relay
pub struct Device {
    pub time: Arc<AtomicI64>,
    pub sync: SyncService,
}

impl Device {
    pub async fn connect(relay: &Relay) -> Self {
        let time = Arc::new(AtomicI64::new(0));
        let handle = Arc::clone(&time);
        let clock: Clock = Arc::new(move || handle.load(Ordering::SeqCst));
        let store = TombstoneStore::with_clock(Arc::new(MemoryStore::new()), clock);
        let sync = SyncService::new(store, Arc::new(MemoryStore::new()));
        sync.update_config(SyncConfigUpdate {
            worker_url: Some(relay.url.clone()),
            api_key: Some(TOKEN.to_string()),
            enabled: Some(true),
            ..SyncConfigUpdate::default()
        })
        .await
        .unwrap();
        Self { time, sync }
    }

    pub fn at(&self, now: i64) -> &Self {
        self.time.store(now, Ordering::SeqCst);
        self
    }

    pub fn store(&self) -> &TombstoneStore {
        self.sync.store()
    }

    pub async fn sync_ok(&self) {
        let outcome = self.sync.sync().await.unwrap();
        assert!(outcome.success, "sync failed: {:?}", outcome.error);
    }
}
