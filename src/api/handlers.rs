//! API Handlers
//!
//! HTTP request handlers exposing the cache to a local collaborator.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::{BoundedExpiringCache, MAX_KEY_LENGTH};
use crate::error::{CacheError, Result};
use crate::models::{DeleteResponse, HealthResponse, SetResponse, StatsResponse};

/// Application state shared across all handlers.
///
/// The cache handle is internally synchronized, so no extra lock is needed.
#[derive(Clone, Debug)]
pub struct AppState {
    pub cache: BoundedExpiringCache,
}

impl AppState {
    pub fn new(cache: BoundedExpiringCache) -> Self {
        Self { cache }
    }
}

/// Rejects empty or over-long keys.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

/// Handler for PUT /objects/:key
///
/// Stores the raw request body under `key`.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<SetResponse>> {
    validate_key(&key)?;

    let size = body.len();
    state.cache.set(key.clone(), body.to_vec());

    Ok(Json(SetResponse::new(key, size)))
}

/// Handler for GET /objects/:key
///
/// Returns the stored bytes as `application/octet-stream`.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    validate_key(&key)?;

    let value = state.cache.get(&key).ok_or(CacheError::NotFound(key))?;

    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], value).into_response())
}

/// Handler for DELETE /objects/:key
///
/// Idempotent: deleting an absent key succeeds with `removed: false`.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    validate_key(&key)?;

    let removed = state.cache.delete(&key);

    Ok(Json(DeleteResponse::new(key, removed)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().into())
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.is_sweeping()))
}
