//! Twin registry commands.

use anyhow::{Context, Result};
use console::style;
use qdt_backend::{ControlRoom, Outcome, TwinCreate, TwinId, created_twin_id, parse_json};
use serde_json::{Map, Value};

use super::common::{Connection, check, print_json};

/// List registered twins.
pub async fn execute_list(connection: &Connection) -> Result<()> {
    let mut room = ControlRoom::new(connection.client()?);
    room.refresh_twins().await;
    check(&room)?;

    let twins = room.twins();
    if twins.is_empty() {
        println!("No twins registered.");
        return Ok(());
    }

    println!("{} {} twin(s):\n", style("→").cyan().bold(), twins.len());
    println!(
        "  {:<24}  {:<28}  {}",
        style("ID").bold(),
        style("NAME").bold(),
        style("KIND").bold()
    );
    println!("  {}", "-".repeat(70));

    for twin in twins {
        let marker = if room.selected() == Some(&twin.id) {
            style("*").green().bold()
        } else {
            style(" ")
        };
        println!(
            "{marker} {:<24}  {:<28}  {}",
            style(twin.id.as_str()).dim(),
            twin.name,
            twin.kind
        );
    }

    Ok(())
}

/// Register a twin and report the id it was given.
pub async fn execute_create(
    connection: &Connection,
    name: &str,
    kind: &str,
    metadata: Option<&str>,
) -> Result<()> {
    let metadata = match metadata {
        Some(text) => parse_metadata(text)?,
        None => Map::new(),
    };
    let twin = TwinCreate::new(name, kind).with_metadata(metadata);

    let mut room = ControlRoom::new(connection.client()?);
    let Some(body) = room.create_twin(&twin).await else {
        check(&room)?;
        anyhow::bail!("Create failed");
    };

    match created_twin_id(&body) {
        Some(id) => println!(
            "{} Created twin {}",
            style("✓").green().bold(),
            style(id).cyan()
        ),
        None => println!("{} Twin created", style("✓").green().bold()),
    }

    // The twin exists even when the listing that follows fails.
    if let Some(message) = room.error() {
        eprintln!(
            "{} Could not refresh the twin list: {message}",
            style("Warning:").yellow().bold()
        );
    }

    Ok(())
}

/// Show one twin.
pub async fn execute_show(connection: &Connection, twin: &str) -> Result<()> {
    let twin_id = TwinId::new(twin).context("Select a twin first")?;
    let client = connection.client()?;

    match client.get_twin(&twin_id).await?.into_outcome("Get twin failed") {
        Outcome::Success(body) => {
            print_json(Some(&body));
            Ok(())
        }
        Outcome::Failure(message) => anyhow::bail!("{message}"),
    }
}

fn parse_metadata(text: &str) -> Result<Map<String, Value>> {
    match parse_json(text)? {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("Metadata must be a JSON object"),
    }
}
