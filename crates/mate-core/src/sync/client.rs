//! HTTP client for the relay's `POST /sync` endpoint.

use reqwest::StatusCode;
use serde::Deserialize;

use super::{SyncError, SyncResult};
use crate::models::SyncSnapshot;
use crate::util::{compact_text, is_http_url, normalize_text_option};

#[derive(Clone)]
pub struct RelayClient {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for RelayClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RelayClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl RelayClient {
    /// Build a client for the relay at `worker_url`.
    ///
    /// No request timeout is set; a hung relay keeps the call pending until
    /// the transport gives up.
    pub fn new(worker_url: &str, api_key: &str) -> SyncResult<Self> {
        let endpoint = sync_endpoint(worker_url)?;
        let api_key = normalize_text_option(Some(api_key.to_string())).ok_or_else(|| {
            SyncError::InvalidConfiguration("API key must not be empty".to_string())
        })?;
        Ok(Self {
            endpoint,
            api_key,
            client: reqwest::Client::builder().build()?,
        })
    }

    /// Full URL of the sync endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send the local snapshot and return the relay's merged snapshot.
    ///
    /// `Ok(None)` means the relay acknowledged the sync without returning data.
    pub async fn sync(&self, snapshot: &SyncSnapshot) -> SyncResult<Option<SyncSnapshot>> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .json(snapshot)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SyncError::Relay(parse_api_error(status, &body)));
        }

        let payload: RelayResponse = serde_json::from_str(&body).map_err(|error| {
            SyncError::Relay(format!("Invalid relay response: {error}"))
        })?;
        if payload.success != Some(true) {
            return Err(SyncError::Relay(
                payload
                    .error
                    .or(payload.message)
                    .unwrap_or_else(|| "Sync failed".to_string()),
            ));
        }

        Ok(payload.data)
    }
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    success: Option<bool>,
    data: Option<SyncSnapshot>,
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RelayErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<RelayErrorBody>(body) {
        if let Some(error) = payload.error.or(payload.message) {
            return error.trim().to_string();
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() || trimmed.starts_with('<') {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

fn sync_endpoint(worker_url: &str) -> SyncResult<String> {
    let base = normalize_text_option(Some(worker_url.to_string())).ok_or_else(|| {
        SyncError::InvalidConfiguration("worker URL must not be empty".to_string())
    })?;
    if !is_http_url(&base) {
        return Err(SyncError::InvalidConfiguration(
            "worker URL must include http:// or https://".to_string(),
        ));
    }
    Ok(format!("{}/sync", base.trim_end_matches('/')))
}
