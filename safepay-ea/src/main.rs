//! safepay-ea - Evidence Analysis gateway
//!
//! **Module Identity:**
//! - Name: safepay-ea (Evidence Analysis)
//! - Port: 6900
//!
//! Accepts scam evidence from SafePay clients (voice recordings, chat
//! screenshots, document images, video, free text), routes each submission
//! to the right specialized analysis backend, runs the speech-to-text
//! workflow where one is needed, and returns a single normalized verdict
//! shape regardless of which backend answered.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use safepay_common::config::{ConfigOverrides, GatewayConfig};
use safepay_ea::AppState;

/// Command-line arguments for safepay-ea
#[derive(Parser, Debug)]
#[command(name = "safepay-ea")]
#[command(about = "Evidence Analysis gateway for SafePay")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "SAFEPAY_PORT")]
    port: Option<u16>,

    /// Path to the TOML configuration file
    #[arg(short, long, env = "SAFEPAY_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for staging uploaded evidence
    #[arg(long, env = "SAFEPAY_UPLOADS_DIR")]
    uploads_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Resolve configuration: CLI > environment > TOML file > defaults
    let config = GatewayConfig::load(ConfigOverrides {
        config_path: args.config,
        port: args.port,
        uploads_dir: args.uploads_dir,
    })
    .context("Failed to load configuration")?;

    // Initialize tracing with the resolved log filter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting SafePay Evidence Analysis (safepay-ea) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    info!("Voice analysis backend: {}", config.voice_analysis_url);
    info!("Document service backend: {}", config.document_service_url);
    info!("Media service backend: {}", config.media_service_url);
    info!("Evidence staging directory: {}", config.uploads_dir.display());

    if config.transcription_api_key.is_none() {
        warn!("No transcription API key configured; audio uploads will be rejected");
    }

    let port = config.port;
    let state = AppState::new(config).context("Failed to initialize application state")?;
    let shutdown = state.shutdown.clone();

    let app = safepay_ea::build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Listening on http://{}", addr);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
///
/// Cancelling the shared token aborts in-flight transcription polling, so
/// draining never waits out a slow provider.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }

    shutdown.cancel();
}
