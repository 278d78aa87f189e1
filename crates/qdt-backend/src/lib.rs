//! QDT Backend - pass-through client for the hybrid quantum–classical orchestrator.
//!
//! The orchestrator owns twins, their state and the routing policy. This
//! crate is the thin layer in front of it: one operator action becomes one
//! HTTP call, and the orchestrator's status code and JSON body come back
//! unchanged.
//!
//! - [`BackendClient`]: the Backend Client Contract (base URL, token,
//!   no-store, status passthrough)
//! - twin registry: [`BackendClient::list_twins`], [`BackendClient::create_twin`]
//! - state proxy: [`BackendClient::get_state`], [`BackendClient::set_state`]
//! - execution proxy: [`BackendClient::execute_job`]
//! - [`ControlRoom`]: the operator session driving the proxies
//!
//! # Example
//!
//! ```rust,no_run
//! use qdt_backend::{BackendClient, BackendConfig, JobRequest, TwinId};
//!
//! # async fn run() -> Result<(), qdt_backend::ProxyError> {
//! let client = BackendClient::new(BackendConfig::from_env())?;
//!
//! let twin = TwinId::new("twin_3f2a9c1d0e4b");
//! let job = JobRequest::new("dispatch", 400, 20_000, "LOW", serde_json::json!({}));
//! let response = client.execute_job(twin.as_ref(), job).await?;
//!
//! println!("{} {}", response.status(), response.body());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod execute;
pub mod session;
pub mod state;
pub mod twins;

pub use client::{AUTH_HEADER, BackendClient, BackendResponse, Orchestrator, Outcome, parse_json};
pub use config::BackendConfig;
pub use error::{ProxyError, ProxyResult};
pub use execute::{JobRequest, JobResultView, Route};
pub use session::ControlRoom;
pub use state::StateUpdate;
pub use twins::{Twin, TwinCreate, TwinId, created_twin_id, twins_from_listing};
