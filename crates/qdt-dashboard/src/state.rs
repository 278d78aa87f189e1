//! Application state for the dashboard server.

use std::net::SocketAddr;

use qdt_backend::{BackendClient, BackendConfig, ProxyResult};

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,
    /// Allowed CORS origins: comma-separated, or `*`.
    pub cors_origins: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_address: ([127, 0, 0, 1], 3000).into(),
            cors_origins: "*".to_string(),
        }
    }
}

/// Shared application state: configuration plus the one orchestrator client.
///
/// Immutable after startup; handlers never coordinate with each other.
pub struct AppState {
    /// Orchestrator client (holds the backend configuration).
    pub client: BackendClient,
    /// Dashboard configuration.
    pub config: DashboardConfig,
}

impl AppState {
    /// Create application state with default dashboard settings.
    pub fn new(backend: BackendConfig) -> ProxyResult<Self> {
        Self::with_config(DashboardConfig::default(), backend)
    }

    /// Create application state with custom configuration.
    pub fn with_config(config: DashboardConfig, backend: BackendConfig) -> ProxyResult<Self> {
        Ok(Self {
            client: BackendClient::new(backend)?,
            config,
        })
    }
}
