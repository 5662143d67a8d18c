//! API Handlers
//!
//! HTTP request handlers mapping each endpoint onto a store or snapshot
//! operation.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::models::{
    GetResponse, HealthResponse, LoadResponse, RemoveResponse, SetResponse, StatsResponse,
};
use crate::store::{Entry, KeyValueStore, SnapshotCodec};

/// Application state shared across all handlers.
///
/// The store synchronizes internally, so handlers share it through a plain Arc.
#[derive(Clone)]
pub struct AppState {
    /// Shared key-value store
    pub store: Arc<KeyValueStore>,
    /// Snapshot file codec used by dump and load
    pub snapshot: Arc<SnapshotCodec>,
}

impl AppState {
    /// Creates a new AppState with the given store and snapshot codec.
    pub fn new(store: KeyValueStore, snapshot: SnapshotCodec) -> Self {
        Self {
            store: Arc::new(store),
            snapshot: Arc::new(snapshot),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            KeyValueStore::new(config.default_ttl),
            SnapshotCodec::new(config.snapshot_path.clone()),
        )
    }
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state
        .store
        .get(&key)
        .ok_or_else(|| StoreError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for GET /getall
///
/// An empty store is reported as 404 rather than an empty list.
pub async fn list_handler(State(state): State<AppState>) -> Result<Json<Vec<Entry>>> {
    let entries = state.store.list();
    if entries.is_empty() {
        return Err(StoreError::NotFound("store is empty".to_string()));
    }

    Ok(Json(entries))
}

/// Handler for POST /set/:key/:value
pub async fn set_handler(
    State(state): State<AppState>,
    Path((key, value)): Path<(String, String)>,
) -> Result<(StatusCode, Json<SetResponse>)> {
    state.store.set(key.as_str(), value, None)?;

    Ok((
        StatusCode::CREATED,
        Json(SetResponse::new(key, state.store.default_ttl())),
    ))
}

/// Handler for POST /set/:key/:value/:ttl
pub async fn set_with_ttl_handler(
    State(state): State<AppState>,
    Path((key, value, ttl)): Path<(String, String, i64)>,
) -> Result<(StatusCode, Json<SetResponse>)> {
    state.store.set(key.as_str(), value, Some(ttl))?;

    Ok((StatusCode::CREATED, Json(SetResponse::new(key, ttl))))
}

/// Handler for PUT /remove/:key
///
/// Clears the value and returns it; the key keeps its slot until it expires.
pub async fn remove_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<RemoveResponse>> {
    let value = state
        .store
        .remove(&key)
        .ok_or_else(|| StoreError::NotFound(key.clone()))?;

    Ok(Json(RemoveResponse::new(key, value)))
}

/// Handler for GET /dump
///
/// Writes the snapshot file and returns its text as the body.
pub async fn dump_handler(State(state): State<AppState>) -> Result<String> {
    let snapshot = tokio::task::spawn_blocking(move || state.snapshot.dump(&state.store))
        .await
        .map_err(|err| StoreError::Io(std::io::Error::other(err)))??;

    if snapshot.is_empty() {
        return Err(StoreError::NotFound("store is empty".to_string()));
    }
    Ok(snapshot)
}

/// Handler for POST /load
pub async fn load_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<LoadResponse>)> {
    let loaded = tokio::task::spawn_blocking(move || state.snapshot.load(&state.store))
        .await
        .map_err(|err| StoreError::Io(std::io::Error::other(err)))??;

    info!("Store restored from snapshot ({} entries)", loaded);
    Ok((StatusCode::CREATED, Json(LoadResponse::new(loaded))))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.store.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
