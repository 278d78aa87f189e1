//! Control Room session: the operator-facing state around the proxies.
//!
//! Each action follows the same rules as the browser panel:
//!
//! 1. clear the previous error (and the output the action owns),
//! 2. check local preconditions (twin selected, input text parses),
//! 3. make exactly one orchestrator call,
//! 4. store the success body, or set the error to the backend `detail`
//!    or the action's fallback message.
//!
//! No retries, no optimistic updates, no merging of results.

use serde_json::Value;

use crate::client::{BackendResponse, Orchestrator, Outcome};
use crate::error::{ProxyError, ProxyResult};
use crate::execute::JobRequest;
use crate::state::StateUpdate;
use crate::twins::{Twin, TwinCreate, TwinId, created_twin_id, twins_from_listing};

const LIST_FAILED: &str = "Failed to list twins";
const CREATE_FAILED: &str = "Create failed";
const STATE_UPDATE_FAILED: &str = "State update failed";
const GET_STATE_FAILED: &str = "Get state failed";
const EXECUTE_FAILED: &str = "Execute failed";
const TELEMETRY_INVALID: &str = "Telemetry must be valid JSON";
const JOB_INVALID: &str = "Job must be valid JSON";

/// One operator session.
pub struct ControlRoom<O> {
    orchestrator: O,
    twins: Vec<Twin>,
    selected: Option<TwinId>,
    state_output: Option<Value>,
    execution_output: Option<Value>,
    error: Option<String>,
}

impl<O: Orchestrator> ControlRoom<O> {
    pub fn new(orchestrator: O) -> Self {
        Self {
            orchestrator,
            twins: Vec::new(),
            selected: None,
            state_output: None,
            execution_output: None,
            error: None,
        }
    }

    pub fn orchestrator(&self) -> &O {
        &self.orchestrator
    }

    pub fn twins(&self) -> &[Twin] {
        &self.twins
    }

    pub fn selected(&self) -> Option<&TwinId> {
        self.selected.as_ref()
    }

    pub fn state_output(&self) -> Option<&Value> {
        self.state_output.as_ref()
    }

    pub fn execution_output(&self) -> Option<&Value> {
        self.execution_output.as_ref()
    }

    /// The error banner, if the most recent action failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Select a twin by id. A blank id clears the selection.
    pub fn select(&mut self, twin_id: &str) {
        self.selected = TwinId::new(twin_id);
    }

    /// Reload the twin list. Selects the first twin if none is selected.
    pub async fn refresh_twins(&mut self) {
        self.error = None;
        let result = self.orchestrator.list_twins().await;
        let Some(body) = self.settle(result, LIST_FAILED) else {
            return;
        };

        self.twins = twins_from_listing(&body);
        if self.selected.is_none() {
            self.selected = self.twins.first().map(|t| t.id.clone());
        }
    }

    /// Create a twin, reload the list and select the new twin.
    ///
    /// Returns the create response body when the orchestrator accepted the
    /// twin, even if the refresh that follows fails.
    pub async fn create_twin(&mut self, twin: &TwinCreate) -> Option<Value> {
        self.error = None;
        self.execution_output = None;
        self.state_output = None;

        let result = self.orchestrator.create_twin(twin).await;
        let body = self.settle(result, CREATE_FAILED)?;

        self.refresh_twins().await;
        if let Some(id) = created_twin_id(&body) {
            self.selected = Some(id);
        }
        Some(body)
    }

    /// Push telemetry text as the selected twin's state.
    pub async fn push_state(&mut self, telemetry: &str) {
        self.error = None;
        self.state_output = None;

        let Some(twin_id) = self.require_twin() else {
            return;
        };
        let update = match StateUpdate::parse_payload(telemetry) {
            Ok(update) => update,
            Err(_) => {
                self.error = Some(TELEMETRY_INVALID.to_string());
                return;
            }
        };

        let result = self.orchestrator.set_state(&twin_id, &update).await;
        self.state_output = self.settle(result, STATE_UPDATE_FAILED);
    }

    /// Load the selected twin's latest state.
    pub async fn load_state(&mut self) {
        self.error = None;
        self.state_output = None;

        let Some(twin_id) = self.require_twin() else {
            return;
        };

        let result = self.orchestrator.get_state(&twin_id).await;
        self.state_output = self.settle(result, GET_STATE_FAILED);
    }

    /// Submit job text for the selected twin.
    pub async fn execute_job(&mut self, job: &str) {
        self.error = None;
        self.execution_output = None;

        let Some(twin_id) = self.require_twin() else {
            return;
        };
        let job = match JobRequest::parse(job) {
            Ok(job) => job,
            Err(_) => {
                self.error = Some(JOB_INVALID.to_string());
                return;
            }
        };

        let result = self.orchestrator.execute_job(Some(&twin_id), job).await;
        self.execution_output = self.settle(result, EXECUTE_FAILED);
    }

    fn require_twin(&mut self) -> Option<TwinId> {
        if self.selected.is_none() {
            self.error = Some(ProxyError::NoTwinSelected.detail());
        }
        self.selected.clone()
    }

    /// Reduce a proxy result to the success body, recording any failure.
    fn settle(
        &mut self,
        result: ProxyResult<BackendResponse>,
        fallback: &str,
    ) -> Option<Value> {
        match result.map(|resp| resp.into_outcome(fallback)) {
            Ok(Outcome::Success(body)) => Some(body),
            Ok(Outcome::Failure(message)) => {
                self.error = Some(message);
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "control room action failed");
                self.error = Some(e.detail());
                None
            }
        }
    }
}
