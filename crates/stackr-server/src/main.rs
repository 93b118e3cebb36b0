//! Stackr server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered under
//! `STACKR_*` environment variables, opens the SQLite store, starts the
//! midnight rating scheduler and serves the JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use stackr_api::AppState;
use stackr_server::{ServerConfig, identity::GoogleIdentity, scheduler};
use stackr_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Stackr stack catalog server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  if server_cfg.google_client_id.is_empty() {
    tracing::warn!("google_client_id is not set; every sign-in will be rejected");
  }

  let store_path = server_cfg.resolved_store_path();
  if let Some(parent) = store_path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open_with_timeout(&store_path, server_cfg.store_busy_timeout())
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let store = Arc::new(store);

  let identity = GoogleIdentity::new(server_cfg.google(), server_cfg.identity_timeout())
    .context("failed to build identity provider client")?;

  if server_cfg.rating_schedule_enabled {
    tokio::spawn(scheduler::run(Arc::clone(&store)));
  } else {
    tracing::info!("rating scheduler disabled");
  }

  let state = AppState::new(store, Arc::new(identity));
  let app = stackr_api::api_router(state)
    .layer(TimeoutLayer::new(server_cfg.request_timeout()))
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}

