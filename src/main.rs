use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use tokio::signal;
use tracing::info;

mod api;
mod client;
mod config;
mod error;
mod probe;
mod report;
mod services;
mod state;

use config::Config;

const DEFAULT_LOG_FILTER: &str = "status_board=info,tower_http=warn";
const CLI_LOG_FILTER: &str = "status_board=warn";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        // Docker HEALTHCHECK: hit /healthz and exit, no curl/wget needed in the image.
        Some("--healthcheck") => return healthcheck().await,
        Some("--status") => return print_status(args.next()).await,
        _ => {}
    }

    let config_path = std::env::var("STATUS_BOARD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("status-board.toml"));

    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .server
                    .log_level
                    .as_deref()
                    .unwrap_or(DEFAULT_LOG_FILTER)
                    .into()
            }),
        )
        .init();

    let prober = probe::Prober::new(
        services::monitored_services(),
        config.probe.timeout(),
        &config.probe.user_agent(),
    )?;
    info!(
        services = prober.endpoints().len(),
        timeout_ms = ?config.probe.timeout_ms,
        "status-board starting"
    );

    let state = Arc::new(state::AppState::new(prober));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "listening");

    let app = api::router(state).layer(
        tower_http::trace::TraceLayer::new_for_http()
            .make_span_with(tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO))
            .on_response(tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO)),
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}

/// Port of the locally running server, from `STATUS_BOARD_PORT` (default 3000).
fn local_port() -> u16 {
    std::env::var("STATUS_BOARD_PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(3000)
}

/// Lightweight healthcheck: GET /healthz and exit 0 on 200, 1 otherwise.
/// Invoked via `status-board --healthcheck` from Docker HEALTHCHECK.
async fn healthcheck() -> anyhow::Result<()> {
    let url = format!("http://127.0.0.1:{}/healthz", local_port());
    let resp = reqwest::get(&url).await?;

    if resp.status().is_success() {
        std::process::exit(0);
    } else {
        std::process::exit(1);
    }
}

/// One-shot status client: fetch `/api/health` from `base_url` and print the table.
/// Exits 1 when the fetch fails.
async fn print_status(base_url: Option<String>) -> anyhow::Result<()> {
    // Diagnostics go to stderr so stdout carries only the table.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CLI_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let base_url = base_url.unwrap_or_else(|| format!("http://127.0.0.1:{}", local_port()));
    let client = client::StatusClient::new(&base_url)?;

    let mut view = client::StatusView::new();
    view.refresh(&client).await;
    print!("{}", view.render());

    if view.error.is_some() {
        std::process::exit(1);
    }
    Ok(())
}
