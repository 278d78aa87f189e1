//! Error types for orchestrator proxy calls.

use thiserror::Error;

/// Result type for proxy operations.
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Errors raised on the client side of the orchestrator boundary.
///
/// A non-success status returned by the orchestrator is *not* an error here:
/// it arrives as a [`BackendResponse`](crate::BackendResponse) and is relayed
/// untouched. Only failures that happen before or instead of a backend answer
/// are represented.
///
/// The `Display` text of each variant is the `detail` string shown to the
/// operator.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// No backend base address was configured.
    #[error("BACKEND_BASE_URL not set")]
    NotConfigured,

    /// Input text or body was not valid structured data.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// An endpoint that needs a twin was called without one.
    #[error("Select a twin first")]
    NoTwinSelected,

    /// The request never produced a response.
    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered, but not with JSON.
    #[error("Backend request failed: status {status} with a non-JSON body ({source})")]
    InvalidBody {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl ProxyError {
    /// Whether the error was detected locally, before any network I/O.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ProxyError::NotConfigured | ProxyError::MalformedInput(_) | ProxyError::NoTwinSelected
        )
    }

    /// The operator-facing message.
    pub fn detail(&self) -> String {
        self.to_string()
    }

    pub(crate) fn malformed(e: impl std::fmt::Display) -> Self {
        ProxyError::MalformedInput(e.to_string())
    }
}
