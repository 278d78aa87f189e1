//! Response types for the dashboard API.

use axum::{
    body::Bytes,
    http::header,
    response::{IntoResponse, Response},
};
use qdt_backend::{BackendResponse, ProxyError};
use serde::Serialize;
use serde_json::Value;

/// Local liveness report.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            service: "qdt-dashboard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// An orchestrator response relayed to the browser.
///
/// Status code and body bytes go out exactly as they came in.
#[derive(Debug)]
pub struct Relay(pub BackendResponse);

impl IntoResponse for Relay {
    fn into_response(self) -> Response {
        let (status, body) = self.0.into_raw_parts();
        (
            status,
            [
                (header::CONTENT_TYPE, "application/json"),
                (header::CACHE_CONTROL, "no-store"),
            ],
            body,
        )
            .into_response()
    }
}

/// Parse a raw request body as JSON without involving the orchestrator.
pub fn parse_body(body: &Bytes) -> Result<Value, ProxyError> {
    serde_json::from_slice(body).map_err(|e| ProxyError::MalformedInput(e.to_string()))
}
