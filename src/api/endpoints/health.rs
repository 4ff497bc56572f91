//! Liveness and readiness endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::config;

#[derive(Serialize)]
pub struct RootResponse {
    pub app: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

/// `GET /` — liveness banner.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        app: config::APP_NAME,
        version: config::APP_VERSION,
        status: "running",
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_connected: bool,
}

/// `GET /health` — readiness. An unreachable store reports degraded,
/// not an error status.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let db_connected = ctx.collections.ping().await;

    Json(HealthResponse {
        status: if db_connected { "ok" } else { "degraded" },
        version: config::APP_VERSION,
        db_connected,
    })
}
