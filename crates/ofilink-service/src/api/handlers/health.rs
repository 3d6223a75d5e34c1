//! Health and fallback handlers

use crate::api::state::AppState;
use crate::error::ApiError;
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub message: &'static str,
    pub version: String,
    pub storage: &'static str,
    pub uptime_secs: i64,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        message: "OFILINK 2.0 API alive",
        version: state.version.clone(),
        storage: state.store.backend_label(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound("route not found".to_string())
}
