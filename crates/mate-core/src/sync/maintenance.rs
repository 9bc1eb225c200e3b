//! Scheduled tombstone cleanup.
//!
//! Purging a tombstone before every peer has seen it lets that peer resurrect
//! the entry, so cleanup runs on a slow, explicit cadence instead of on every
//! sync.

use std::time::Duration;

use crate::error::Result;
use crate::store::{CleanupReport, TombstoneStore};

/// How long a tombstone is kept before it may be purged (30 days)
pub const DEFAULT_TOMBSTONE_RETENTION: Duration = Duration::from_secs(30 * 24 * 60 * 60);
/// Minimum time between two cleanup passes (24 hours)
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TombstoneJanitor {
    retention: Duration,
    min_interval: Duration,
}

impl Default for TombstoneJanitor {
    fn default() -> Self {
        Self::new(DEFAULT_TOMBSTONE_RETENTION, DEFAULT_CLEANUP_INTERVAL)
    }
}

impl TombstoneJanitor {
    pub const fn new(retention: Duration, min_interval: Duration) -> Self {
        Self {
            retention,
            min_interval,
        }
    }

    pub const fn retention(&self) -> Duration {
        self.retention
    }

    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Whether a pass is due given the previous run time (Unix ms)
    pub fn is_due(&self, last_run: Option<i64>, now: i64) -> bool {
        let Some(last_run) = last_run else {
            return true;
        };
        let interval_ms = i64::try_from(self.min_interval.as_millis()).unwrap_or(i64::MAX);
        now.saturating_sub(last_run) >= interval_ms
    }

    /// Purge expired tombstones now
    pub async fn run_once(&self, store: &TombstoneStore) -> Result<CleanupReport> {
        store.cleanup_tombstones(self.retention).await
    }

    /// Purge expired tombstones if the minimum interval has elapsed.
    ///
    /// Returns `None` when the pass was skipped.
    pub async fn run_if_due(
        &self,
        store: &TombstoneStore,
        last_run: Option<i64>,
    ) -> Result<Option<CleanupReport>> {
        if !self.is_due(last_run, store.now()) {
            tracing::trace!(?last_run, "Tombstone cleanup not due yet");
            return Ok(None);
        }
        self.run_once(store).await.map(Some)
    }
}
