//! API endpoint handlers.
//!
//! Every `/api/*` route other than `/api/health` maps to exactly one
//! orchestrator call and relays its answer.

pub mod execute;
pub mod health;
pub mod state;
pub mod twins;
