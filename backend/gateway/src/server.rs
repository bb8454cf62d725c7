//! Main HTTP Gateway Server.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

use defectscan_understanding::DefectAnalyzer;
use media::MAX_UPLOAD_BYTES;

use crate::{analyze_api, control_ui, health_api};

/// Room for multipart framing on top of the largest accepted image.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Default cap on request bodies.
pub const DEFAULT_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD;

/// Application state shared across routes. Immutable after startup.
#[derive(Clone)]
pub struct GatewayState {
    pub analyzer: Arc<DefectAnalyzer>,
    pub credential_configured: bool,
    pub started_at: Instant,
    /// Largest request body accepted; bigger uploads get 413.
    pub body_limit: usize,
}

impl GatewayState {
    pub fn new(analyzer: Arc<DefectAnalyzer>, credential_configured: bool) -> Self {
        Self {
            analyzer,
            credential_configured,
            started_at: Instant::now(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }
}

/// Build the router with the UI page, upload endpoint, and health check.
pub fn build_router(state: GatewayState) -> Router {
    let body_limit = state.body_limit;
    Router::new()
        .route("/api/analyze", post(analyze_api::analyze_upload))
        .route("/api/health", get(health_api::get_health))
        .merge(control_ui::ui_router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the HTTP server and runs until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: &str, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Gateway HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
