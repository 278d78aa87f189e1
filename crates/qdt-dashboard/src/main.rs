//! QDT Control Room binary entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use qdt_backend::BackendConfig;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qdt_dashboard::{AppState, DashboardConfig, create_router};

/// Local control panel and proxy for the QDT orchestrator.
#[derive(Debug, Parser)]
#[command(name = "qdt-dashboard", version, about)]
struct Args {
    /// Address to serve the dashboard on
    #[arg(long, env = "QDT_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Orchestrator base address [default: $BACKEND_BASE_URL]
    #[arg(long = "backend-url")]
    backend_url: Option<String>,

    /// Static API token forwarded as x-api-token [default: $API_AUTH_TOKEN]
    #[arg(long)]
    token: Option<String>,

    /// Allowed CORS origins (comma-separated, or *)
    #[arg(long = "cors-origins", env = "QDT_CORS_ORIGINS", default_value = "*")]
    cors_origins: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loads .env too, so QDT_BIND and QDT_CORS_ORIGINS can live there.
    let backend = BackendConfig::from_env();
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "qdt_dashboard=info,qdt_backend=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let backend = backend.overridden(args.backend_url, args.token);
    match backend.base_url() {
        Some(url) => info!("Orchestrator at {url}"),
        None => warn!("BACKEND_BASE_URL not set; proxy routes will answer 500"),
    }
    if !backend.has_auth_token() {
        warn!("API_AUTH_TOKEN not set; requests go out with an empty x-api-token");
    }

    let config = DashboardConfig {
        bind_address: args.bind,
        cors_origins: args.cors_origins,
    };
    let bind_addr = config.bind_address;
    info!("CORS origins: {}", config.cors_origins);

    let state = Arc::new(AppState::with_config(config, backend)?);
    let app = create_router(state);

    info!("Starting QDT Control Room at http://{bind_addr}");
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("QDT Control Room shut down");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
