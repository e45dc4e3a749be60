//! System API endpoints.

use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiResponse, AppState, SystemStatusDto};

/// Returns version, uptime and collection size.
///
/// # Endpoint
/// `GET /api/system/status`
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<ApiResponse<SystemStatusDto>> {
    let drama_count = state.dramas.read().await.len();

    Json(ApiResponse::success(SystemStatusDto {
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        drama_count,
        metrics_enabled: state.prometheus_handle.is_some(),
    }))
}
