//! Health check endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::dto::{HealthResponse, Relay};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/health - Dashboard liveness; never touches the orchestrator.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// GET /api/backend/health - Orchestrator `/healthz`, relayed.
pub async fn backend_health(State(state): State<Arc<AppState>>) -> Result<Relay, ApiError> {
    Ok(Relay(state.client.health().await?))
}
