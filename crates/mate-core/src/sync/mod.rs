//! Local sync client: configuration, status tracking, the relay HTTP client,
//! and the maintenance job that purges old tombstones.

mod client;
mod maintenance;
mod service;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::CleanupReport;
use crate::util::{is_http_url, normalize_text_option};

pub use client::RelayClient;
pub use maintenance::{TombstoneJanitor, DEFAULT_CLEANUP_INTERVAL, DEFAULT_TOMBSTONE_RETENTION};
pub use service::{generate_api_key, SyncService, SYNC_AREA, SYNC_CONFIG_KEY, SYNC_STATE_KEY};

/// Lower bound for the auto-sync interval, in minutes
pub const MIN_SYNC_INTERVAL_MINUTES: u32 = 1;
/// Upper bound for the auto-sync interval, in minutes (one day)
pub const MAX_SYNC_INTERVAL_MINUTES: u32 = 1440;
/// Default auto-sync interval, in minutes
pub const DEFAULT_SYNC_INTERVAL_MINUTES: u32 = 30;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Sync is not configured or not enabled")]
    NotConfigured,
    #[error("Relay request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{0}")]
    Relay(String),
    #[error(transparent)]
    Storage(#[from] crate::Error),
    #[error("Invalid sync configuration: {0}")]
    InvalidConfiguration(String),
}

pub type SyncResult<T> = Result<T, SyncError>;

/// Relay connection settings, persisted outside the synced snapshot.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    /// Base URL of the relay, without trailing slash
    pub worker_url: String,
    /// Bearer credential identifying the sync group
    pub api_key: String,
    pub enabled: bool,
    pub auto_sync: bool,
    /// Minutes between automatic syncs
    pub sync_interval: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            worker_url: String::new(),
            api_key: String::new(),
            enabled: false,
            auto_sync: false,
            sync_interval: DEFAULT_SYNC_INTERVAL_MINUTES,
        }
    }
}

impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SyncConfig")
            .field("worker_url", &self.worker_url)
            .field(
                "api_key",
                &if self.api_key.is_empty() {
                    ""
                } else {
                    "[REDACTED]"
                },
            )
            .field("enabled", &self.enabled)
            .field("auto_sync", &self.auto_sync)
            .field("sync_interval", &self.sync_interval)
            .finish()
    }
}

impl SyncConfig {
    /// Both the relay URL and the API key are present
    pub fn has_credentials(&self) -> bool {
        !self.worker_url.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    /// Credentials are present and sync is switched on
    pub fn is_ready(&self) -> bool {
        self.enabled && self.has_credentials()
    }

    /// Whether the auto-sync timer should be running
    pub const fn wants_auto_sync(&self) -> bool {
        self.enabled && self.auto_sync
    }

    /// Trim fields, strip the trailing slash from the URL, and check bounds.
    pub fn normalized(mut self) -> SyncResult<Self> {
        self.worker_url = normalize_text_option(Some(self.worker_url))
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_default();
        if !self.worker_url.is_empty() && !is_http_url(&self.worker_url) {
            return Err(SyncError::InvalidConfiguration(
                "worker URL must include http:// or https://".to_string(),
            ));
        }

        self.api_key = self.api_key.trim().to_string();

        if !(MIN_SYNC_INTERVAL_MINUTES..=MAX_SYNC_INTERVAL_MINUTES).contains(&self.sync_interval) {
            return Err(SyncError::InvalidConfiguration(format!(
                "sync interval must be between {MIN_SYNC_INTERVAL_MINUTES} and \
                 {MAX_SYNC_INTERVAL_MINUTES} minutes"
            )));
        }

        Ok(self)
    }
}

/// Partial update applied over the stored [`SyncConfig`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncConfigUpdate {
    pub worker_url: Option<String>,
    pub api_key: Option<String>,
    pub enabled: Option<bool>,
    pub auto_sync: Option<bool>,
    pub sync_interval: Option<u32>,
}

impl SyncConfigUpdate {
    pub fn apply_to(self, mut config: SyncConfig) -> SyncConfig {
        if let Some(worker_url) = self.worker_url {
            config.worker_url = worker_url;
        }
        if let Some(api_key) = self.api_key {
            config.api_key = api_key;
        }
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
        if let Some(auto_sync) = self.auto_sync {
            config.auto_sync = auto_sync;
        }
        if let Some(sync_interval) = self.sync_interval {
            config.sync_interval = sync_interval;
        }
        config
    }
}

/// Sync status shown to the user.
///
/// `Conflict` is reserved; conflicts are resolved silently by last-write-wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Success,
    Error,
    Conflict,
}

impl SyncStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Syncing => "syncing",
            Self::Success => "success",
            Self::Error => "error",
            Self::Conflict => "conflict",
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted sync status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncState {
    pub status: SyncStatus,
    pub last_sync_time: Option<i64>,
    pub last_error_message: Option<String>,
    pub is_configured: bool,
    /// Last time the tombstone janitor ran (Unix ms)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_cleanup_time: Option<i64>,
}

/// Partial update applied over the stored [`SyncState`].
///
/// Option-of-option fields distinguish "leave alone" from "clear".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStateUpdate {
    pub status: Option<SyncStatus>,
    pub last_sync_time: Option<Option<i64>>,
    pub last_error_message: Option<Option<String>>,
    pub is_configured: Option<bool>,
    pub last_cleanup_time: Option<Option<i64>>,
}

impl SyncStateUpdate {
    pub fn apply_to(self, mut state: SyncState) -> SyncState {
        if let Some(status) = self.status {
            state.status = status;
        }
        if let Some(last_sync_time) = self.last_sync_time {
            state.last_sync_time = last_sync_time;
        }
        if let Some(last_error_message) = self.last_error_message {
            state.last_error_message = last_error_message;
        }
        if let Some(is_configured) = self.is_configured {
            state.is_configured = is_configured;
        }
        if let Some(last_cleanup_time) = self.last_cleanup_time {
            state.last_cleanup_time = last_cleanup_time;
        }
        state
    }
}

/// Result of one sync round-trip; failures are reported here, not raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub last_sync_time: i64,
    /// Tombstones purged by the post-sync maintenance pass, if it ran
    #[serde(skip)]
    pub cleanup: Option<CleanupReport>,
}

impl SyncOutcome {
    pub const fn succeeded(last_sync_time: i64, cleanup: Option<CleanupReport>) -> Self {
        Self {
            success: true,
            error: None,
            last_sync_time,
            cleanup,
        }
    }

    pub const fn failed(error: String, last_sync_time: i64) -> Self {
        Self {
            success: false,
            error: Some(error),
            last_sync_time,
            cleanup: None,
        }
    }
}
