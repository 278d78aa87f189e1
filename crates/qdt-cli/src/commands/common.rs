//! Shared helpers for CLI commands.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use qdt_backend::{BackendClient, BackendConfig, ControlRoom, Orchestrator};
use serde_json::Value;

/// Orchestrator settings resolved from flags, environment and `.env`.
#[derive(Debug, Clone)]
pub struct Connection {
    config: BackendConfig,
}

impl Connection {
    pub fn new(config: BackendConfig) -> Self {
        if !config.has_auth_token() {
            tracing::warn!("API_AUTH_TOKEN not set; sending an empty x-api-token");
        }
        Self { config }
    }

    pub fn client(&self) -> Result<BackendClient> {
        BackendClient::new(self.config.clone()).context("Failed to build HTTP client")
    }

    /// A fresh session with `twin` selected.
    pub fn session_for(&self, twin: &str) -> Result<ControlRoom<BackendClient>> {
        let mut room = ControlRoom::new(self.client()?);
        room.select(twin);
        Ok(room)
    }
}

/// Read a JSON document given inline or as a file path (`-` for stdin).
pub fn read_input(inline: Option<&str>, file: Option<&Path>) -> Result<String> {
    match (inline, file) {
        (Some(text), _) => Ok(text.to_string()),
        (None, Some(path)) if path == Path::new("-") => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        (None, None) => anyhow::bail!("Provide a JSON document inline or with --file"),
    }
}

/// Turn the session's error banner into a command failure.
pub fn check<O: Orchestrator>(room: &ControlRoom<O>) -> Result<()> {
    match room.error() {
        Some(message) => anyhow::bail!("{message}"),
        None => Ok(()),
    }
}

/// Print a JSON body pretty-printed, or `(none)`.
pub fn print_json(body: Option<&Value>) {
    match body.map(serde_json::to_string_pretty) {
        Some(Ok(text)) => println!("{text}"),
        Some(Err(_)) | None => println!("{}", style("(none)").dim()),
    }
}
