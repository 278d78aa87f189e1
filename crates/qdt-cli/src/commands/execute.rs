//! Job execution command.

use std::path::Path;

use anyhow::Result;
use console::style;
use qdt_backend::{JobRequest, JobResultView, Outcome, Route, TwinId};
use serde_json::Value;

use super::common::{Connection, check, print_json, read_input};

/// Submit a job for the twin, or only preview its routing.
pub async fn execute(
    connection: &Connection,
    twin: &str,
    json: Option<&str>,
    file: Option<&Path>,
    preview: bool,
) -> Result<()> {
    let text = read_input(json, file)?;

    let body = if preview {
        preview_route(connection, twin, &text).await?
    } else {
        let mut room = connection.session_for(twin)?;
        room.execute_job(&text).await;
        check(&room)?;
        room.execution_output().cloned().unwrap_or(Value::Null)
    };

    print_summary(&body);
    print_json(Some(&body));
    Ok(())
}

async fn preview_route(connection: &Connection, twin: &str, text: &str) -> Result<Value> {
    let job = JobRequest::parse(text).map_err(|_| anyhow::anyhow!("Job must be valid JSON"))?;
    let twin_id = TwinId::new(twin);

    let client = connection.client()?;
    match client
        .preview_route(twin_id.as_ref(), job)
        .await?
        .into_outcome("Route preview failed")
    {
        Outcome::Success(body) => Ok(body),
        Outcome::Failure(message) => anyhow::bail!("{message}"),
    }
}

fn print_summary(body: &Value) {
    let view = JobResultView::new(body);
    let Some(route) = view.route() else {
        return;
    };

    let route_styled = match route {
        Route::Quantum => style(route.to_string()).magenta().bold(),
        Route::Classical => style(route.to_string()).cyan().bold(),
    };
    println!("{} Route: {route_styled}", style("→").cyan().bold());

    if let Some(rationale) = view.rationale() {
        println!("  Rationale: {rationale}");
    }
    if let Some(fallback) = view.fallback_used() {
        let fallback_styled = if fallback {
            style("yes").yellow()
        } else {
            style("no").dim()
        };
        println!("  Fallback:  {fallback_styled}");
    }
    if let Some(request_id) = view.request_id() {
        println!("  Request:   {}", style(request_id).dim());
    }
    println!();
}
