//! GET /api/health

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::api::middleware::AppState;
use crate::db::DatabasePool;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub uptime_seconds: u64,
    pub requests: u64,
    pub avg_response_time_us: f64,
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, code, database) = match state.pool.ping().await {
        Ok(()) => ("ok", StatusCode::OK, "connected"),
        Err(e) => {
            tracing::warn!("Health check database ping failed: {:#}", e);
            ("degraded", StatusCode::SERVICE_UNAVAILABLE, "disconnected")
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            database,
            uptime_seconds: state.request_stats.uptime_seconds(),
            requests: state.request_stats.total_requests(),
            avg_response_time_us: state.request_stats.avg_response_time_us(),
        }),
    )
}
