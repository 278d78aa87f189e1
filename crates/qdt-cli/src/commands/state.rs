//! Twin state commands.

use std::path::Path;

use anyhow::Result;

use super::common::{Connection, check, print_json, read_input};

/// Show the selected twin's latest snapshot.
pub async fn execute_get(connection: &Connection, twin: &str) -> Result<()> {
    let mut room = connection.session_for(twin)?;
    room.load_state().await;
    check(&room)?;

    print_json(room.state_output());
    Ok(())
}

/// Push a telemetry payload for the twin.
pub async fn execute_push(
    connection: &Connection,
    twin: &str,
    json: Option<&str>,
    file: Option<&Path>,
) -> Result<()> {
    let telemetry = read_input(json, file)?;

    let mut room = connection.session_for(twin)?;
    room.push_state(&telemetry).await;
    check(&room)?;

    print_json(room.state_output());
    Ok(())
}
