//! HTTP client for the QDT orchestrator.
//!
//! Every operation maps to exactly one outbound request. Whatever the
//! orchestrator answers (status code and JSON body) is handed back as a
//! [`BackendResponse`] without inspection, so callers can relay it verbatim.
//!
//! ## Request shape
//!
//! | Header | Value |
//! |--------|-------|
//! | `x-api-token` | configured token, or empty |
//! | `cache-control` | `no-store` |
//! | `content-type` | `application/json` (requests with a body) |

use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, RequestBuilder, StatusCode, header};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::BackendConfig;
use crate::error::{ProxyError, ProxyResult};
use crate::execute::JobRequest;
use crate::state::StateUpdate;
use crate::twins::{TwinCreate, TwinId};

/// Header carrying the static API token.
pub const AUTH_HEADER: &str = "x-api-token";

/// User agent string for outbound calls.
const USER_AGENT: &str = concat!("qdt-backend/", env!("CARGO_PKG_VERSION"));

/// Characters left unescaped in a single path segment (RFC 3986 unreserved).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// The orchestrator operations the Control Room depends on.
#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// `GET /api/twins`.
    async fn list_twins(&self) -> ProxyResult<BackendResponse>;

    /// `POST /api/twins`.
    async fn create_twin(&self, twin: &TwinCreate) -> ProxyResult<BackendResponse>;

    /// `GET /api/state/{twin_id}`.
    async fn get_state(&self, twin_id: &TwinId) -> ProxyResult<BackendResponse>;

    /// `POST /api/state/{twin_id}`.
    async fn set_state(
        &self,
        twin_id: &TwinId,
        update: &StateUpdate,
    ) -> ProxyResult<BackendResponse>;

    /// `POST /api/execute` for the selected twin.
    async fn execute_job(
        &self,
        selected: Option<&TwinId>,
        job: JobRequest,
    ) -> ProxyResult<BackendResponse>;
}

/// Status and JSON body exactly as the orchestrator returned them.
///
/// `raw` holds the body bytes as received (validated as JSON); `body` is
/// the parsed view used for inspection. Relaying uses `raw`, so key order
/// and number precision survive the round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendResponse {
    status: StatusCode,
    body: Value,
    raw: Bytes,
}

/// A response reduced to what the presentation layer renders.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// 2xx: the body to display.
    Success(Value),
    /// Anything else: the message for the error banner.
    Failure(String),
}

impl BackendResponse {
    /// Build a response from a parsed body; the raw bytes are its JSON text.
    pub fn new(status: StatusCode, body: Value) -> Self {
        let raw = Bytes::from(body.to_string());
        Self { status, body, raw }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Body bytes exactly as the orchestrator sent them (`null` if empty).
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    pub fn into_parts(self) -> (StatusCode, Value) {
        (self.status, self.body)
    }

    pub fn into_raw_parts(self) -> (StatusCode, Bytes) {
        (self.status, self.raw)
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The backend's `detail` field rendered as text, if present.
    ///
    /// FastAPI sends a string for handled errors and a list of issues for
    /// validation failures; the latter is rendered as compact JSON.
    pub fn detail(&self) -> Option<String> {
        match self.body.get("detail")? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Split into success body or failure message, falling back to
    /// `fallback` when the backend gave no `detail`.
    pub fn into_outcome(self, fallback: &str) -> Outcome {
        if self.is_success() {
            Outcome::Success(self.body)
        } else {
            Outcome::Failure(self.detail().unwrap_or_else(|| fallback.to_string()))
        }
    }

    async fn read(response: reqwest::Response) -> ProxyResult<Self> {
        let status = response.status();
        let bytes = response.bytes().await?;

        // An empty body still has to be relayed as JSON.
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new(status, Value::Null));
        }

        let body = serde_json::from_slice(&bytes).map_err(|source| ProxyError::InvalidBody {
            status: status.as_u16(),
            source,
        })?;

        Ok(Self {
            status,
            body,
            raw: bytes,
        })
    }
}

/// Parse operator-supplied text as JSON.
pub fn parse_json(text: &str) -> ProxyResult<Value> {
    serde_json::from_str(text).map_err(ProxyError::malformed)
}

/// Orchestrator client.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    config: BackendConfig,
}

impl BackendClient {
    /// Create a client. No connection is made until the first call.
    pub fn new(config: BackendConfig) -> ProxyResult<Self> {
        // No timeout: a hung orchestrator call hangs the action that made it.
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProxyError::Transport)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Fail with [`ProxyError::NotConfigured`] if there is no base address.
    pub fn ensure_configured(&self) -> ProxyResult<()> {
        self.base_url().map(|_| ())
    }

    /// `GET /healthz` on the orchestrator.
    #[instrument(skip(self))]
    pub async fn health(&self) -> ProxyResult<BackendResponse> {
        self.get("/healthz").await
    }

    fn base_url(&self) -> ProxyResult<&str> {
        self.config.base_url().ok_or(ProxyError::NotConfigured)
    }

    pub(crate) fn url(&self, path: &str) -> ProxyResult<String> {
        Ok(format!("{}{}", self.base_url()?, path))
    }

    pub(crate) async fn get(&self, path: &str) -> ProxyResult<BackendResponse> {
        let url = self.url(path)?;
        debug!("GET {}", url);
        self.dispatch(self.client.get(&url)).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ProxyResult<BackendResponse> {
        let url = self.url(path)?;
        debug!("POST {}", url);
        self.dispatch(self.client.post(&url).json(body)).await
    }

    async fn dispatch(&self, request: RequestBuilder) -> ProxyResult<BackendResponse> {
        let response = request
            .header(AUTH_HEADER, self.config.auth_token())
            .header(header::CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let response = BackendResponse::read(response).await?;
        debug!(status = response.status().as_u16(), "orchestrator responded");
        Ok(response)
    }
}

#[async_trait]
impl Orchestrator for BackendClient {
    async fn list_twins(&self) -> ProxyResult<BackendResponse> {
        BackendClient::list_twins(self).await
    }

    async fn create_twin(&self, twin: &TwinCreate) -> ProxyResult<BackendResponse> {
        BackendClient::create_twin(self, twin).await
    }

    async fn get_state(&self, twin_id: &TwinId) -> ProxyResult<BackendResponse> {
        BackendClient::get_state(self, twin_id).await
    }

    async fn set_state(
        &self,
        twin_id: &TwinId,
        update: &StateUpdate,
    ) -> ProxyResult<BackendResponse> {
        BackendClient::set_state(self, twin_id, update).await
    }

    async fn execute_job(
        &self,
        selected: Option<&TwinId>,
        job: JobRequest,
    ) -> ProxyResult<BackendResponse> {
        BackendClient::execute_job(self, selected, job).await
    }
}

/// Escape a twin identifier for use as one path segment.
pub(crate) fn path_segment(id: &TwinId) -> String {
    utf8_percent_encode(id.as_str(), PATH_SEGMENT).to_string()
}
