//! QDT Control Room - Local web dashboard for the hybrid orchestrator.
//!
//! Serves a single-page control panel and a thin `/api` proxy in front of
//! the remote orchestrator. Operators can:
//!
//! - List, create and select digital twins
//! - Push and read telemetry snapshots for the selected twin
//! - Submit routed jobs and inspect the routing decision
//!
//! The proxy keeps the orchestrator address and API token on the server;
//! orchestrator answers are relayed with their status and body untouched.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use qdt_backend::BackendConfig;
//! use qdt_dashboard::{AppState, DashboardConfig, create_router};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DashboardConfig::default();
//!     let state = Arc::new(AppState::with_config(config.clone(), BackendConfig::from_env())?);
//!
//!     let app = create_router(state);
//!     let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod dto;
pub mod error;
pub mod server;
pub mod state;

pub use dto::{HealthResponse, Relay};
pub use error::{ApiError, ErrorResponse};
pub use server::create_router;
pub use state::{AppState, DashboardConfig};
