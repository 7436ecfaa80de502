//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, get_handler, health_handler, set_handler, stats_handler, AppState,
};
use crate::cache::MAX_VALUE_SIZE;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /objects/:key` - Store the request body
/// - `GET /objects/:key` - Retrieve stored bytes
/// - `DELETE /objects/:key` - Delete a key
/// - `GET /stats` - Occupancy statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Body limit: values above `MAX_VALUE_SIZE` are refused with 413
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/objects/:key",
            put(set_handler).get(get_handler).delete(delete_handler),
        )
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(MAX_VALUE_SIZE))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
