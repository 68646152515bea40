//! HTTP request handlers

use super::agent_card::AgentCard;
use super::state::AppState;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search query
    pub q: Option<String>,
}

/// Liveness banner
pub async fn index() -> impl IntoResponse {
    Json(json!({
        "status": "success",
        "value": "Internet Search Agent is running",
        "version": crate::VERSION
    }))
}

/// A2A agent card
pub async fn agent_card(State(state): State<AppState>) -> impl IntoResponse {
    Json(AgentCard::from_settings(&state.settings))
}

/// Search handler
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = match params.q {
        Some(q) if !q.trim().is_empty() => q,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "missing query parameter 'q'" })),
            )
                .into_response()
        }
    };

    let report = state.router.search_with_report(&query).await;
    Json(report).into_response()
}

/// JSON-RPC endpoint for the search tool
pub async fn rpc(State(state): State<AppState>, body: String) -> Response {
    match state.tools.handle_line(&body).await {
        Some(response) => ([(header::CONTENT_TYPE, "application/json")], response).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Router metrics
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "agent": state.agent_name(),
        "providers": state.router.chain().names(),
        "metrics": state.metrics.snapshot(),
    }))
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
