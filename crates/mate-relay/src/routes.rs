use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::{header, HeaderName, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Extension, Json, Router};
use mate_core::kv::{KeyValueStore, StoreError};
use mate_core::merge::merge_snapshots;
use mate_core::util::{system_clock, Clock};
use mate_core::{LibSqlStore, SyncSnapshot};
use serde::Serialize;
use serde_json::Value;
use tower_http::trace::TraceLayer;

use crate::auth::{extract_bearer_token, BearerToken};
use crate::config::RelayConfig;
use crate::error::AppError;
use crate::locks::TokenLocks;

/// Key-value area of the relay's snapshot map
pub const RELAY_AREA: &str = "relay";

const CORS_HEADERS: [(HeaderName, &str); 4] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (
        header::ACCESS_CONTROL_ALLOW_METHODS,
        "GET, POST, PUT, DELETE, OPTIONS",
    ),
    (
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        "Content-Type, Authorization",
    ),
    (header::ACCESS_CONTROL_MAX_AGE, "86400"),
];

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    snapshots: Arc<dyn KeyValueStore>,
    locks: TokenLocks,
    clock: Clock,
}

impl AppState {
    /// State over an explicit snapshot map
    pub fn new(config: Arc<RelayConfig>, snapshots: Arc<dyn KeyValueStore>) -> Self {
        Self {
            config,
            snapshots,
            locks: TokenLocks::new(),
            clock: system_clock(),
        }
    }

    /// Open the libSQL database named by the config
    pub async fn from_config(config: Arc<RelayConfig>) -> Result<Self, StoreError> {
        let store = if config.is_in_memory() {
            LibSqlStore::open_in_memory().await?
        } else {
            LibSqlStore::open(&config.db_path).await?
        };
        Ok(Self::new(config, Arc::new(store.area(RELAY_AREA))))
    }

    /// Replace the clock used to stamp `lastSyncTime`
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

pub fn app_router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route(
            "/sync",
            post(sync_snapshot).fallback(|| async { AppError::MethodNotAllowed }),
        )
        .fallback(|| async { AppError::NotFound })
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(middleware::from_fn(require_bearer))
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Answer preflights and stamp CORS headers on everything else
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        (StatusCode::NO_CONTENT, Body::empty()).into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    for (name, value) in CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}

/// Runs before routing so unknown paths without credentials get 401
async fn require_bearer(mut request: Request, next: Next) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?.to_string();
    request.extensions_mut().insert(BearerToken(token));
    Ok(next.run(request).await)
}

#[derive(Debug, Serialize)]
struct SyncResponse {
    success: bool,
    data: SyncSnapshot,
    message: &'static str,
}

async fn sync_snapshot(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
    body: Bytes,
) -> Result<Json<SyncResponse>, AppError> {
    let client = parse_client_snapshot(&body)?;

    let _guard = state.locks.acquire(&token.0).await;
    let stored = load_stored_snapshot(&state, &token).await?;

    let merge = merge_snapshots(client, stored, (state.clock)());
    let encoded = serde_json::to_string(&merge.snapshot).map_err(AppError::internal)?;
    state
        .snapshots
        .set_one(&token.0, encoded)
        .await
        .map_err(AppError::internal)?;

    tracing::info!(
        token = token.fingerprint(),
        notes = merge.snapshot.notes.len(),
        prompts = merge.snapshot.prompts.len(),
        notes_inserted = merge.notes.inserted,
        notes_replaced = merge.notes.replaced,
        prompts_inserted = merge.prompts.inserted,
        prompts_replaced = merge.prompts.replaced,
        "Merged sync snapshot"
    );

    Ok(Json(SyncResponse {
        success: true,
        data: merge.snapshot,
        message: "Sync completed successfully",
    }))
}

fn parse_client_snapshot(body: &[u8]) -> Result<SyncSnapshot, AppError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|error| AppError::bad_request(format!("body is not JSON: {error}")))?;
    if !value.is_object() {
        return Err(AppError::bad_request("body is not a JSON object"));
    }
    serde_json::from_value(value).map_err(|error| AppError::bad_request(error.to_string()))
}

/// Stored snapshot for `token`; unreadable data counts as none
async fn load_stored_snapshot(
    state: &AppState,
    token: &BearerToken,
) -> Result<Option<SyncSnapshot>, AppError> {
    let Some(raw) = state
        .snapshots
        .get_one(&token.0)
        .await
        .map_err(AppError::internal)?
    else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(error) => {
            tracing::warn!(
                token = token.fingerprint(),
                "Failed to parse stored snapshot, treating as empty: {error}"
            );
            Ok(None)
        }
    }
}
