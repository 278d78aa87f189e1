//! Twin registry endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
};
use qdt_backend::{ProxyError, TwinCreate, TwinId};

use crate::dto::{Relay, parse_body};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/twins - List twins.
pub async fn list_twins(State(state): State<Arc<AppState>>) -> Result<Relay, ApiError> {
    Ok(Relay(state.client.list_twins().await?))
}

/// POST /api/twins - Create a twin from `{ name, kind, metadata }`.
///
/// Unlike the other proxied bodies this one is read into [`TwinCreate`]:
/// only `name`, `kind` and `metadata` are forwarded, `metadata` defaults to
/// `{}` and must be an object when given. Anything else is a local 400.
pub async fn create_twin(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Relay, ApiError> {
    state.client.ensure_configured()?;

    let twin: TwinCreate = serde_json::from_value(parse_body(&body)?)
        .map_err(|e| ProxyError::MalformedInput(e.to_string()))?;

    Ok(Relay(state.client.create_twin(&twin).await?))
}

/// GET /api/twins/:twin_id - Fetch one twin.
pub async fn get_twin(
    State(state): State<Arc<AppState>>,
    Path(twin_id): Path<String>,
) -> Result<Relay, ApiError> {
    state.client.ensure_configured()?;
    let twin_id = TwinId::new(twin_id).ok_or(ProxyError::NoTwinSelected)?;

    Ok(Relay(state.client.get_twin(&twin_id).await?))
}
