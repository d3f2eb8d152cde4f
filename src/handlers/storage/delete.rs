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
pub struct DeleteRequest {
    dest: String,
}

pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    req: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Empty>>, AppError> {
    let Json(req) = req.map_err(|err| AppError::Validation(err.body_text()))?;
    let dest = req.dest.trim();
    if dest.is_empty() {
        return Err(AppError::Validation("dest must not be empty".to_string()));
    }

    state.storage.remove(dest).await?;
    Ok(Json(ApiResponse::success(Empty {})))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::storage::testutil::make_state;

    #[tokio::test]
    async fn deletes_a_directory_tree() {
        let (temp, state) = make_state();
        std::fs::create_dir_all(temp.path().join("d/sub")).unwrap();
        std::fs::write(temp.path().join("d/sub/f.txt"), b"x").unwrap();

        let req = Ok(Json(DeleteRequest {
            dest: "/d".to_string(),
        }));
        delete_entry(State(state), req).await.unwrap();
        assert!(!temp.path().join("d").exists());
    }

    #[tokio::test]
    async fn missing_target_maps_to_not_found() {
        let (_temp, state) = make_state();
        let req = Ok(Json(DeleteRequest {
            dest: "/absent".to_string(),
        }));
        let result = delete_entry(State(state), req).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
