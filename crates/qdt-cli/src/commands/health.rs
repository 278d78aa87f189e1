//! Orchestrator health command.

use anyhow::Result;
use console::style;
use qdt_backend::Outcome;

use super::common::{Connection, print_json};

/// Probe `/healthz` on the orchestrator.
pub async fn execute(connection: &Connection) -> Result<()> {
    let client = connection.client()?;
    let base_url = client.config().base_url().unwrap_or_default().to_string();

    match client.health().await?.into_outcome("Health check failed") {
        Outcome::Success(body) => {
            println!(
                "{} Orchestrator at {} is up",
                style("✓").green().bold(),
                style(base_url).cyan()
            );
            print_json(Some(&body));
            Ok(())
        }
        Outcome::Failure(message) => anyhow::bail!("{message}"),
    }
}
