//! Gateway Health API
//!
//! Reports process liveness and whether an API key was configured.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::server::GatewayState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub model: String,
    pub credential_configured: bool,
    pub uptime_seconds: u64,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    let generator = state.analyzer.generator();
    Json(HealthReport {
        status: "ok",
        service: "defectscan",
        version: env!("CARGO_PKG_VERSION"),
        provider: generator.name().to_string(),
        model: generator.model().to_string(),
        credential_configured: state.credential_configured,
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}
