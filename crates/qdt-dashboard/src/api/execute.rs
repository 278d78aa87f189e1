//! Job execution endpoints.

use std::sync::Arc;

use axum::{body::Bytes, extract::State};
use qdt_backend::{JobRequest, TwinId};

use crate::dto::{Relay, parse_body};
use crate::error::ApiError;
use crate::state::AppState;

/// Parse the job body and pull out the twin it is bound to.
fn job_and_twin(body: &Bytes) -> Result<(JobRequest, Option<TwinId>), ApiError> {
    let job = JobRequest::from_value(parse_body(body)?)?;
    let twin_id = job.twin_id().and_then(TwinId::new);
    Ok((job, twin_id))
}

/// POST /api/execute - Route and run a job for the twin named in `twin_id`.
pub async fn execute_job(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Relay, ApiError> {
    state.client.ensure_configured()?;
    let (job, twin_id) = job_and_twin(&body)?;

    Ok(Relay(state.client.execute_job(twin_id.as_ref(), job).await?))
}

/// POST /api/route - Routing decision only, nothing executed.
pub async fn preview_route(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Relay, ApiError> {
    state.client.ensure_configured()?;
    let (job, twin_id) = job_and_twin(&body)?;

    Ok(Relay(state.client.preview_route(twin_id.as_ref(), job).await?))
}
