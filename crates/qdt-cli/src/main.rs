//! QDT Control Room command-line interface.
//!
//! Drives the orchestrator from a terminal with the same rules as the
//! browser dashboard: one action, one orchestrator call, output or error.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use qdt_backend::BackendConfig;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::Connection;
use commands::{execute, health, state, twins};

/// QDT - operate digital twins through the hybrid orchestrator
#[derive(Debug, Parser)]
#[command(name = "qdt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Orchestrator base address [default: $BACKEND_BASE_URL]
    #[arg(long = "backend-url", global = true)]
    backend_url: Option<String>,

    /// Static API token forwarded as x-api-token [default: $API_AUTH_TOKEN]
    #[arg(long, global = true)]
    token: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List, create and inspect twins
    Twins {
        #[command(subcommand)]
        action: TwinsAction,
    },

    /// Push or load a twin's state snapshot
    State {
        #[command(subcommand)]
        action: StateAction,
    },

    /// Route and run a job for a twin
    Execute {
        /// Twin the job runs against
        twin: String,

        #[command(flatten)]
        input: JsonInput,

        /// Ask for the routing decision only; nothing is executed
        #[arg(long)]
        preview: bool,
    },

    /// Check that the orchestrator is reachable
    Health,
}

#[derive(Debug, Subcommand)]
enum TwinsAction {
    /// List registered twins
    List,

    /// Register a new twin and select it
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Twin kind (district, grid, ...)
        #[arg(short, long)]
        kind: String,

        /// Metadata as a JSON object
        #[arg(short, long)]
        metadata: Option<String>,
    },

    /// Show one twin
    Show {
        /// Twin id
        twin: String,
    },
}

#[derive(Debug, Subcommand)]
enum StateAction {
    /// Show the latest snapshot
    Get {
        /// Twin id
        twin: String,
    },

    /// Push a telemetry payload
    Push {
        /// Twin id
        twin: String,

        #[command(flatten)]
        input: JsonInput,
    },
}

/// JSON given inline or read from a file.
#[derive(Debug, clap::Args)]
#[group(required = true, multiple = false)]
struct JsonInput {
    /// Inline JSON document
    json: Option<String>,

    /// Read the JSON document from a file (`-` for stdin)
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let backend = BackendConfig::from_env();
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let connection = Connection::new(backend.overridden(cli.backend_url, cli.token));

    // Execute command
    let result = match cli.command {
        Commands::Twins { action } => match action {
            TwinsAction::List => twins::execute_list(&connection).await,
            TwinsAction::Create {
                name,
                kind,
                metadata,
            } => twins::execute_create(&connection, &name, &kind, metadata.as_deref()).await,
            TwinsAction::Show { twin } => twins::execute_show(&connection, &twin).await,
        },
        Commands::State { action } => match action {
            StateAction::Get { twin } => state::execute_get(&connection, &twin).await,
            StateAction::Push { twin, input } => {
                state::execute_push(&connection, &twin, input.json.as_deref(), input.file.as_deref())
                    .await
            }
        },
        Commands::Execute {
            twin,
            input,
            preview,
        } => {
            execute::execute(
                &connection,
                &twin,
                input.json.as_deref(),
                input.file.as_deref(),
                preview,
            )
            .await
        }
        Commands::Health => health::execute(&connection).await,
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
