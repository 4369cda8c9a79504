//! HTTP surface: metric ingestion, the device socket and a health check.

use crate::device;
use crate::hub::HubHandle;
use axum::{
    body::Bytes,
    extract::{State, WebSocketUpgrade},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

#[derive(Clone)]
pub struct AppState {
    pub hub: HubHandle,
    pub package_name: String,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
    pub metrics: usize,
    pub applied: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub package: String,
    pub device_connected: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metrics-update", post(metrics_update))
        .route("/session", get(session))
        .route("/health", get(health))
        .with_state(state)
}

/// Apply a health metric payload
///
/// Malformed bodies are zero updates, not errors. Responds once the
/// in-memory snapshot is updated; the cache save finishes in the background.
async fn metrics_update(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<IngestResponse>, StatusCode> {
    let metrics = hud_core::parse_metrics(&body);
    let received = metrics.len();

    match state.hub.metrics(metrics).await {
        Ok(outcome) => Ok(Json(IngestResponse {
            status: "ok",
            metrics: received,
            applied: outcome.applied,
        })),
        Err(e) => {
            tracing::error!("Metrics update not applied: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

async fn session(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    tracing::debug!("Device socket upgrade requested");
    ws.on_upgrade(move |socket| device::run(socket, state.hub))
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let snapshot = state
        .hub
        .snapshot()
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;

    Ok(Json(HealthResponse {
        status: "ok",
        package: state.package_name,
        device_connected: snapshot.device.is_some(),
    }))
}
