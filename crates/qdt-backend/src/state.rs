//! Per-twin state snapshots.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::client::{BackendClient, BackendResponse, parse_json, path_segment};
use crate::error::{ProxyError, ProxyResult};
use crate::twins::TwinId;

/// Body for `POST /api/state/{twin_id}`.
///
/// `payload` is the telemetry itself. Any other top-level fields (twin-core
/// accepts an explicit `ts`) are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    pub payload: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StateUpdate {
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            extra: Map::new(),
        }
    }

    /// Wrap telemetry text (as typed by the operator) into an update.
    pub fn parse_payload(text: &str) -> ProxyResult<Self> {
        parse_json(text).map(Self::new)
    }

    /// Interpret an already-parsed request body (`{ payload, ... }`).
    pub fn from_body(body: Value) -> ProxyResult<Self> {
        if !body.is_object() {
            return Err(ProxyError::MalformedInput(
                "state update must be a JSON object".to_string(),
            ));
        }
        serde_json::from_value(body).map_err(ProxyError::malformed)
    }
}

impl BackendClient {
    /// Latest snapshot for a twin, verbatim.
    #[instrument(skip(self, twin_id), fields(twin_id = %twin_id))]
    pub async fn get_state(&self, twin_id: &TwinId) -> ProxyResult<BackendResponse> {
        self.get(&state_path(twin_id)).await
    }

    /// Push a snapshot. The backend acknowledgement is returned verbatim.
    #[instrument(skip(self, twin_id, update), fields(twin_id = %twin_id))]
    pub async fn set_state(
        &self,
        twin_id: &TwinId,
        update: &StateUpdate,
    ) -> ProxyResult<BackendResponse> {
        self.post(&state_path(twin_id), update).await
    }
}

fn state_path(twin_id: &TwinId) -> String {
    format!("/api/state/{}", path_segment(twin_id))
}
