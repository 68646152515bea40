//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Agent routes
        .route("/", get(handlers::index))
        .route("/.well-known/agent.json", get(handlers::agent_card))
        // API routes
        .route("/search", get(handlers::search))
        .route("/rpc", post(handlers::rpc))
        .route("/stats", get(handlers::stats))
        .route("/health", get(handlers::health))
        // Add middleware
        .layer(cors)
        // Add state
        .with_state(state)
}
