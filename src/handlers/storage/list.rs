use crate::error::AppError;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::storage::FileItem;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ListParams {
    source: String,
}

#[derive(Serialize)]
pub struct ListResponse {
    files: Vec<FileItem>,
}

pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ApiResponse<ListResponse>>, AppError> {
    let Query(params) = params.map_err(|err| AppError::Validation(err.body_text()))?;
    let source = params.source.trim();
    if source.is_empty() {
        return Err(AppError::Validation("source must not be empty".to_string()));
    }

    let files = state.storage.list(source).await?;
    Ok(Json(ApiResponse::success(ListResponse { files })))
}
