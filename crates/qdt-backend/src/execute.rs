//! Job submission to the hybrid router.
//!
//! The orchestrator decides between the classical and quantum paths; this
//! module only shapes the request (binding it to the selected twin) and
//! hands back whatever the router answered.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::client::{BackendClient, BackendResponse, parse_json};
use crate::error::{ProxyError, ProxyResult};
use crate::twins::TwinId;

/// A job description: `problem_type`, `size`, `deadline_ms`, `risk`,
/// `payload`, and the `twin_id` it concerns.
///
/// Kept as an open JSON object so fields the client does not know about
/// reach the orchestrator unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobRequest(Map<String, Value>);

impl JobRequest {
    /// Build a job from the usual fields.
    pub fn new(
        problem_type: impl Into<String>,
        size: u64,
        deadline_ms: u64,
        risk: impl Into<String>,
        payload: Value,
    ) -> Self {
        let mut fields = Map::new();
        fields.insert("problem_type".into(), Value::String(problem_type.into()));
        fields.insert("size".into(), Value::from(size));
        fields.insert("deadline_ms".into(), Value::from(deadline_ms));
        fields.insert("risk".into(), Value::String(risk.into()));
        fields.insert("payload".into(), payload);
        Self(fields)
    }

    /// Parse job text as typed by the operator.
    pub fn parse(text: &str) -> ProxyResult<Self> {
        Self::from_value(parse_json(text)?)
    }

    /// Accept any JSON object.
    pub fn from_value(value: Value) -> ProxyResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            _ => Err(ProxyError::MalformedInput(
                "job must be a JSON object".to_string(),
            )),
        }
    }

    /// `twin_id` currently in the body, if it is a string.
    pub fn twin_id(&self) -> Option<&str> {
        self.0.get("twin_id").and_then(Value::as_str)
    }

    pub fn problem_type(&self) -> Option<&str> {
        self.0.get("problem_type").and_then(Value::as_str)
    }

    /// Bind the job to a twin, replacing any id already present.
    pub fn for_twin(mut self, twin_id: &TwinId) -> Self {
        self.0
            .insert("twin_id".into(), Value::String(twin_id.as_str().to_string()));
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Execution path chosen by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Classical,
    Quantum,
}

impl Route {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CLASSICAL" => Some(Route::Classical),
            "QUANTUM" => Some(Route::Quantum),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Classical => f.write_str("CLASSICAL"),
            Route::Quantum => f.write_str("QUANTUM"),
        }
    }
}

/// Read-only view of a job result for display.
///
/// The orchestrator names the fields `route` / `why`; `decision` /
/// `rationale` are accepted as well. Nothing here alters the body.
#[derive(Debug, Clone, Copy)]
pub struct JobResultView<'a> {
    body: &'a Value,
}

impl<'a> JobResultView<'a> {
    pub fn new(body: &'a Value) -> Self {
        Self { body }
    }

    fn text(&self, keys: &[&str]) -> Option<&'a str> {
        keys.iter()
            .find_map(|k| self.body.get(*k).and_then(Value::as_str))
    }

    pub fn route(&self) -> Option<Route> {
        self.text(&["decision", "route"]).and_then(Route::parse)
    }

    pub fn rationale(&self) -> Option<&'a str> {
        self.text(&["rationale", "why"])
    }

    pub fn fallback_used(&self) -> Option<bool> {
        self.body.get("fallback_used").and_then(Value::as_bool)
    }

    pub fn request_id(&self) -> Option<&'a str> {
        self.text(&["request_id"])
    }
}

impl BackendClient {
    /// Submit a job for the selected twin and return the routing result.
    ///
    /// Without a selected twin nothing is sent. The selected id always wins
    /// over a `twin_id` already in the body.
    #[instrument(skip(self, selected, job), fields(twin_id = selected.map(TwinId::as_str)))]
    pub async fn execute_job(
        &self,
        selected: Option<&TwinId>,
        job: JobRequest,
    ) -> ProxyResult<BackendResponse> {
        self.ensure_configured()?;
        let job = bind(selected, job)?;
        self.post("/api/execute", &job).await
    }

    /// Ask the router for its decision without executing the job.
    #[instrument(skip(self, selected, job), fields(twin_id = selected.map(TwinId::as_str)))]
    pub async fn preview_route(
        &self,
        selected: Option<&TwinId>,
        job: JobRequest,
    ) -> ProxyResult<BackendResponse> {
        self.ensure_configured()?;
        let job = bind(selected, job)?;
        self.post("/api/route", &job).await
    }
}

fn bind(selected: Option<&TwinId>, job: JobRequest) -> ProxyResult<JobRequest> {
    let twin_id = selected.ok_or(ProxyError::NoTwinSelected)?;
    Ok(job.for_twin(twin_id))
}
