//! safepay-ea library interface
//!
//! Exposes the application state, router builder, and orchestration
//! components for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use safepay_common::config::GatewayConfig;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use services::AnalysisOrchestrator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolved gateway configuration
    pub config: Arc<GatewayConfig>,
    /// Per-request analysis orchestration
    pub orchestrator: Arc<AnalysisOrchestrator>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last upstream or internal error for diagnostics
    pub last_error: Arc<RwLock<Option<String>>>,
    /// Cancelled when the process begins shutting down; in-flight
    /// transcription polling aborts instead of holding the drain
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Result<Self, safepay_common::Error> {
        let last_error = Arc::new(RwLock::new(None));
        let orchestrator = AnalysisOrchestrator::new(&config, Arc::clone(&last_error))?;

        Ok(Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
            startup_time: Utc::now(),
            last_error,
            shutdown: CancellationToken::new(),
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    // Multipart framing overhead on top of the evidence payload cap
    let body_limit = state.config.max_upload_bytes + 64 * 1024;

    Router::new()
        .merge(api::health_routes())
        .merge(api::audio_routes())
        .merge(api::text_routes())
        .merge(api::image_routes())
        .merge(api::video_routes())
        .merge(api::whatsapp_routes())
        .merge(api::upi_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
