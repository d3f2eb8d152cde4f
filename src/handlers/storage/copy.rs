use crate::error::AppError;
use crate::response::{ApiResponse, Empty};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct CopyRequest {
    source: String,
    dest: String,
}

pub async fn copy_entry(
    State(state): State<Arc<AppState>>,
    req: Result<Json<CopyRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Empty>>, AppError> {
    let Json(req) = req.map_err(|err| AppError::Validation(err.body_text()))?;
    let source = req.source.trim();
    let dest = req.dest.trim();
    if source.is_empty() || dest.is_empty() {
        return Err(AppError::Validation(
            "source and dest must not be empty".to_string(),
        ));
    }

    state.storage.copy(source, dest).await?;
    Ok(Json(ApiResponse::success(Empty {})))
}
