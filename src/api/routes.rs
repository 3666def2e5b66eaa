//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_all_handler, delete_handler, get_handler, health_handler, print_local_handler,
    print_remote_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a key-value pair in both backends
/// - `GET /get/:key` - Retrieve a value both backends agree on
/// - `DELETE /del/:key` - Delete a key from both backends
/// - `DELETE /del_all` - Clear both backends
/// - `GET /print/local` - Render the local store in recency order
/// - `GET /print/remote` - Render the remote store in recency order
/// - `GET /stats` - Local statistics and remote size
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/del_all", delete(delete_all_handler))
        .route("/print/local", get(print_local_handler))
        .route("/print/remote", get(print_remote_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
