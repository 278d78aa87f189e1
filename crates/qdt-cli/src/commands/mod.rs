//! CLI command implementations.

pub mod common;
pub mod execute;
pub mod health;
pub mod state;
pub mod twins;
