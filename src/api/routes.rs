//! API Routes
//!
//! Configures the Axum router with all key-value server endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    dump_handler, get_handler, health_handler, list_handler, load_handler, remove_handler,
    set_handler, set_with_ttl_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/get/:key", get(get_handler))
        .route("/getall", get(list_handler))
        .route("/set/:key/:value", post(set_handler))
        .route("/set/:key/:value/:ttl", post(set_with_ttl_handler))
        .route("/remove/:key", put(remove_handler))
        .route("/dump", get(dump_handler))
        .route("/load", post(load_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
