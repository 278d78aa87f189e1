//! Twin state endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
};
use qdt_backend::{ProxyError, StateUpdate, TwinId};

use crate::dto::{Relay, parse_body};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/state/:twin_id - Latest snapshot.
pub async fn get_state(
    State(state): State<Arc<AppState>>,
    Path(twin_id): Path<String>,
) -> Result<Relay, ApiError> {
    state.client.ensure_configured()?;
    let twin_id = TwinId::new(twin_id).ok_or(ProxyError::NoTwinSelected)?;

    Ok(Relay(state.client.get_state(&twin_id).await?))
}

/// POST /api/state/:twin_id - Push a snapshot (`{ payload, ... }`).
///
/// The body is parsed here; anything that is not a JSON object with a
/// `payload` is rejected before the orchestrator sees it.
pub async fn set_state(
    State(state): State<Arc<AppState>>,
    Path(twin_id): Path<String>,
    body: Bytes,
) -> Result<Relay, ApiError> {
    state.client.ensure_configured()?;
    let twin_id = TwinId::new(twin_id).ok_or(ProxyError::NoTwinSelected)?;
    let update = StateUpdate::from_body(parse_body(&body)?)?;

    Ok(Relay(state.client.set_state(&twin_id, &update).await?))
}
