//! Sync orchestration: one round-trip against the relay, persisted config and
//! status, and the optional auto-sync timer.

use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use rand::distr::Alphanumeric;
use rand::Rng;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::client::RelayClient;
use super::maintenance::TombstoneJanitor;
use super::{
    SyncConfig, SyncConfigUpdate, SyncError, SyncOutcome, SyncResult, SyncState, SyncStateUpdate,
    SyncStatus,
};
use crate::kv::KeyValueStore;
use crate::store::{CleanupReport, TombstoneStore};

/// Key-value area holding sync config and status
pub const SYNC_AREA: &str = "sync";
pub const SYNC_CONFIG_KEY: &str = "syncConfig";
pub const SYNC_STATE_KEY: &str = "syncState";

const API_KEY_LENGTH: usize = 32;

/// Generate a random 32-character alphanumeric API key
pub fn generate_api_key() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(API_KEY_LENGTH)
        .map(char::from)
        .collect()
}

/// Local sync client.
///
/// Cloning is cheap; clones share the auto-sync timer.
#[derive(Clone)]
pub struct SyncService {
    inner: Arc<Inner>,
}

struct Inner {
    store: TombstoneStore,
    kv: Arc<dyn KeyValueStore>,
    janitor: TombstoneJanitor,
    auto_sync: Mutex<Option<AutoSyncTimer>>,
}

/// A running auto-sync loop.
///
/// Dropping `_stop` ends the loop at its next tick boundary; a sync already
/// in flight always runs to completion and records its status.
struct AutoSyncTimer {
    _stop: watch::Sender<()>,
    handle: JoinHandle<()>,
}

impl SyncService {
    /// Create a service syncing `store`, keeping its own config and status in `kv`
    pub fn new(store: TombstoneStore, kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_janitor(store, kv, TombstoneJanitor::default())
    }

    /// Like [`SyncService::new`] with a custom post-sync cleanup policy
    pub fn with_janitor(
        store: TombstoneStore,
        kv: Arc<dyn KeyValueStore>,
        janitor: TombstoneJanitor,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                kv,
                janitor,
                auto_sync: Mutex::new(None),
            }),
        }
    }

    pub fn store(&self) -> &TombstoneStore {
        &self.inner.store
    }

    pub fn janitor(&self) -> &TombstoneJanitor {
        &self.inner.janitor
    }

    // ---------------------------------------------------------------------
    // Config and status
    // ---------------------------------------------------------------------

    /// Stored config merged over defaults
    pub async fn get_config(&self) -> SyncResult<SyncConfig> {
        self.read_json(SYNC_CONFIG_KEY).await
    }

    /// Apply `update` over the stored config, refresh `isConfigured`, and
    /// start or stop the auto-sync timer to match.
    pub async fn update_config(&self, update: SyncConfigUpdate) -> SyncResult<SyncConfig> {
        let config = update.apply_to(self.get_config().await?).normalized()?;
        self.write_json(SYNC_CONFIG_KEY, &config).await?;

        self.update_state(SyncStateUpdate {
            is_configured: Some(config.has_credentials()),
            ..SyncStateUpdate::default()
        })
        .await?;

        if config.wants_auto_sync() {
            self.start_auto_sync().await?;
        } else {
            self.stop_auto_sync();
        }

        tracing::debug!(?config, "Updated sync config");
        Ok(config)
    }

    /// Forget config and status and stop the auto-sync timer
    pub async fn reset_config(&self) -> SyncResult<()> {
        self.inner
            .kv
            .remove(&[SYNC_CONFIG_KEY, SYNC_STATE_KEY])
            .await
            .map_err(crate::Error::from)?;
        self.stop_auto_sync();
        Ok(())
    }

    /// Stored status merged over defaults
    pub async fn get_state(&self) -> SyncResult<SyncState> {
        self.read_json(SYNC_STATE_KEY).await
    }

    /// Apply `update` over the stored status
    pub async fn update_state(&self, update: SyncStateUpdate) -> SyncResult<SyncState> {
        let state = update.apply_to(self.get_state().await?);
        self.write_json(SYNC_STATE_KEY, &state).await?;
        Ok(state)
    }

    /// Whether both the relay URL and the API key are set
    pub async fn is_configured(&self) -> SyncResult<bool> {
        Ok(self.get_config().await?.has_credentials())
    }

    // ---------------------------------------------------------------------
    // Sync
    // ---------------------------------------------------------------------

    /// Run one sync round-trip.
    ///
    /// Only fails when sync is not configured, leaving the status untouched.
    /// Every other failure is recorded as status `error` and reported through
    /// the returned [`SyncOutcome`]; local data is only replaced on success.
    pub async fn sync(&self) -> SyncResult<SyncOutcome> {
        let config = self.get_config().await?;
        if !config.is_ready() {
            return Err(SyncError::NotConfigured);
        }

        tracing::info!(endpoint = %config.worker_url, "Starting sync");
        match self.round_trip(&config).await {
            Ok(cleanup) => {
                let finished_at = self.inner.store.now();
                let update = SyncStateUpdate {
                    status: Some(SyncStatus::Success),
                    last_sync_time: Some(Some(finished_at)),
                    last_error_message: Some(None),
                    last_cleanup_time: cleanup.map(|_| Some(finished_at)),
                    ..SyncStateUpdate::default()
                };
                if let Err(error) = self.update_state(update).await {
                    tracing::warn!("Failed to record sync success: {error}");
                }
                tracing::info!("Sync completed");
                Ok(SyncOutcome::succeeded(finished_at, cleanup))
            }
            Err(error) => {
                let message = error.to_string();
                tracing::warn!("Sync failed: {message}");
                let update = SyncStateUpdate {
                    status: Some(SyncStatus::Error),
                    last_error_message: Some(Some(message.clone())),
                    ..SyncStateUpdate::default()
                };
                if let Err(error) = self.update_state(update).await {
                    tracing::warn!("Failed to record sync failure: {error}");
                }
                Ok(SyncOutcome::failed(message, self.inner.store.now()))
            }
        }
    }

    async fn round_trip(&self, config: &SyncConfig) -> SyncResult<Option<CleanupReport>> {
        self.update_state(SyncStateUpdate {
            status: Some(SyncStatus::Syncing),
            last_error_message: Some(None),
            ..SyncStateUpdate::default()
        })
        .await?;

        let mut snapshot = self.inner.store.export_all_for_sync().await?;
        snapshot.last_sync_time = Some(self.inner.store.now());

        let client = RelayClient::new(&config.worker_url, &config.api_key)?;
        let Some(merged) = client.sync(&snapshot).await? else {
            return Ok(None);
        };

        self.inner.store.import_snapshot(&merged).await?;
        tracing::debug!(
            notes = merged.notes.len(),
            prompts = merged.prompts.len(),
            tombstones = merged.tombstone_count(),
            "Installed merged snapshot"
        );

        Ok(self.cleanup_if_due().await)
    }

    /// Post-sync maintenance; failures are logged and ignored
    async fn cleanup_if_due(&self) -> Option<CleanupReport> {
        let last_run = match self.get_state().await {
            Ok(state) => state.last_cleanup_time,
            Err(error) => {
                tracing::warn!("Skipping tombstone cleanup: {error}");
                return None;
            }
        };
        match self
            .inner
            .janitor
            .run_if_due(&self.inner.store, last_run)
            .await
        {
            Ok(report) => report,
            Err(error) => {
                tracing::warn!("Tombstone cleanup failed: {error}");
                None
            }
        }
    }

    /// Run `janitor` now and record the run time
    pub async fn run_cleanup(&self, janitor: &TombstoneJanitor) -> SyncResult<CleanupReport> {
        let report = janitor.run_once(&self.inner.store).await?;
        self.update_state(SyncStateUpdate {
            last_cleanup_time: Some(Some(self.inner.store.now())),
            ..SyncStateUpdate::default()
        })
        .await?;
        Ok(report)
    }

    // ---------------------------------------------------------------------
    // Auto-sync
    // ---------------------------------------------------------------------

    /// Start the auto-sync timer if the config asks for it.
    ///
    /// Any running timer is cancelled first. Returns whether a timer is now
    /// running. Must be called from within a tokio runtime.
    pub async fn start_auto_sync(&self) -> SyncResult<bool> {
        let config = self.get_config().await?;
        if !config.wants_auto_sync() {
            return Ok(false);
        }

        self.spawn_auto_sync(Duration::from_secs(u64::from(config.sync_interval) * 60));
        tracing::info!(minutes = config.sync_interval, "Auto-sync started");
        Ok(true)
    }

    /// Install a timer firing every `period`, replacing any previous one
    fn spawn_auto_sync(&self, period: Duration) {
        let (stop, stopped) = watch::channel(());
        let handle = tokio::spawn(auto_sync_loop(
            Arc::downgrade(&self.inner),
            period,
            stopped,
        ));
        // The replaced timer, if any, is dropped here and winds down on its own.
        drop(
            self.inner
                .auto_sync
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .replace(AutoSyncTimer { _stop: stop, handle }),
        );
    }

    /// Cancel the auto-sync timer, if any.
    ///
    /// A sync started by the timer before this call is not interrupted.
    pub fn stop_auto_sync(&self) {
        let timer = self
            .inner
            .auto_sync
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if timer.is_some() {
            tracing::info!("Auto-sync stopped");
        }
    }

    pub fn is_auto_sync_running(&self) -> bool {
        self.inner
            .auto_sync
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|timer| !timer.handle.is_finished())
    }

    async fn read_json<T>(&self, key: &str) -> SyncResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let raw = self
            .inner
            .kv
            .get_one(key)
            .await
            .map_err(crate::Error::from)?;
        let Some(raw) = raw else {
            return Ok(T::default());
        };
        Ok(serde_json::from_str(&raw).unwrap_or_else(|error| {
            tracing::warn!(key, "Ignoring unreadable sync record: {error}");
            T::default()
        }))
    }

    async fn write_json<T>(&self, key: &str, value: &T) -> SyncResult<()>
    where
        T: serde::Serialize + Sync,
    {
        let raw = serde_json::to_string(value).map_err(crate::Error::from)?;
        self.inner
            .kv
            .set_one(key, raw)
            .await
            .map_err(crate::Error::from)?;
        Ok(())
    }
}

/// Timer body; exits when its timer is stopped or every [`SyncService`]
/// handle is gone. Only the wait between ticks is cancellable.
async fn auto_sync_loop(inner: Weak<Inner>, period: Duration, mut stopped: watch::Receiver<()>) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            _ = stopped.changed() => break,
            _ = ticker.tick() => {}
        }
        let Some(inner) = inner.upgrade() else {
            break;
        };
        let service = SyncService { inner };
        match service.sync().await {
            Ok(outcome) if outcome.success => tracing::debug!("Auto-sync completed"),
            Ok(outcome) => tracing::warn!(error = ?outcome.error, "Auto-sync failed"),
            Err(error) => tracing::warn!("Auto-sync skipped: {error}"),
        }
    }
}
