use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    status: String,
    uptime: String,
    version: String,
    storage_ready: bool,
}

pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<HealthCheckResponse>> {
    let uptime = state.start_time.elapsed().as_secs();
    // The process is only useful while the storage root is reachable.
    let storage_ready = state.storage.root().exists();

    Json(ApiResponse::success(HealthCheckResponse {
        status: "ok".to_string(),
        uptime: format!("{}s", uptime),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage_ready,
    }))
}
