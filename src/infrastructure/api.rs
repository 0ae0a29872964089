//! Status API server (Cold Path)
//!
//! Exposes the health report over HTTP for dashboards and probes.
//! Every request is timed into the shared monitor, so the report
//! reflects this server's own traffic as well as anything the host
//! application records.

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::infrastructure::config::ApiConfig;
use crate::monitor::{HealthReport, PerformanceMonitor};
use crate::system::SystemMonitor;
use crate::{PerfError, Result};

/// Liveness response for /api/health
#[derive(Debug, Serialize)]
pub struct StatusDto {
    pub status: &'static str,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<PerformanceMonitor>,
    pub system: Arc<SystemMonitor>,
}

/// Start the status API server
pub async fn start_server(
    monitor: Arc<PerformanceMonitor>,
    system: Arc<SystemMonitor>,
    config: &ApiConfig,
) -> Result<()> {
    let state = AppState { monitor, system };

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Status API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(PerfError::Io)?;

    axum::serve(listener, app).await.map_err(PerfError::Io)?;

    Ok(())
}

/// Build the router with timing middleware and CORS
fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/performance", get(get_performance_report))
        .route("/api/health", get(get_health))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            track_request,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Handler for /api/performance
/// Returns the full health report with current aggregates
async fn get_performance_report(State(state): State<AppState>) -> Json<HealthReport> {
    let snapshot = state.system.snapshot();
    Json(state.monitor.health_report(snapshot))
}

/// Handler for /api/health
/// Cheap liveness probe, no system snapshot
async fn get_health() -> Json<StatusDto> {
    Json(StatusDto { status: "healthy" })
}

/// Record duration and outcome of every request into the monitor
async fn track_request(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let timer = state.monitor.start_call();
    let response = next.run(request).await;
    timer.finish(!response.status().is_server_error());
    response
}
