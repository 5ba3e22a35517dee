//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub database: &'static str,
}

/// GET /api/health — returns server status and database availability.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = match &state.store {
        Some(store) if store.ping().await => "available",
        _ => "unavailable",
    };

    Json(HealthResponse {
        status: "ok",
        message: "Backend is running",
        database,
    })
}
