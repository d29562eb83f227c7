//! Health API

use axum::{Router, extract::State, routing::get};
use shared::ApiResponse;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

/// GET /api/health - liveness probe
async fn health(State(state): State<ServerState>) -> ApiResponse<serde_json::Value> {
    ApiResponse::ok(serde_json::json!({
        "status": "ok",
        "environment": state.config.environment,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
