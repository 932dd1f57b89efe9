//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use crate::model::EngineStatus;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    engine: EngineStatus,
    active_sessions: usize,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    state.model.ready().await;
    let engine = state.model.status();

    Json(HealthResponse {
        status: if engine.model_loaded { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        engine,
        active_sessions: state.sessions.count(),
    })
}
