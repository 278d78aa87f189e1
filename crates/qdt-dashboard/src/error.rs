//! Error types for the dashboard API.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use qdt_backend::ProxyError;
use serde::Serialize;

/// Errors produced by the dashboard itself, before or instead of an
/// orchestrator answer. Orchestrator errors are relayed, not wrapped.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Proxy(#[from] ProxyError),

    #[error("No API route for {0}")]
    NotFound(String),
}

/// Body of every locally generated error: the same `detail` field the
/// orchestrator uses, so the UI reads one key.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Proxy(ProxyError::NotConfigured) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Proxy(ProxyError::MalformedInput(_) | ProxyError::NoTwinSelected) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Proxy(ProxyError::Transport(_) | ProxyError::InvalidBody { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "proxy call failed");
        }

        let body = Json(ErrorResponse {
            detail: self.to_string(),
        });

        (status, [(header::CACHE_CONTROL, "no-store")], body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(ProxyError::NotConfigured).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(ProxyError::NoTwinSelected).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ProxyError::MalformedInput("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_unknown_route_is_not_found() {
        let err = ApiError::NotFound("/api/nope".into());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "No API route for /api/nope");
    }

    #[test]
    fn test_display_is_proxy_detail() {
        let err = ApiError::from(ProxyError::NotConfigured);
        assert_eq!(err.to_string(), "BACKEND_BASE_URL not set");
    }
}
