use crate::error::AppError;
use crate::response::{ApiResponse, Empty};
use crate::state::AppState;
use axum::{
    extract::{
        multipart::{Field, Multipart, MultipartRejection},
        State,
    },
    Json,
};
use futures::StreamExt;
use std::sync::Arc;

/// `multipart/form-data` with fields `overwrite` (`Y`/`N`), `dest`,
/// `filename` and an optional binary `blob`. No `blob` means a
/// directory is created instead of a file.
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<Empty>>, AppError> {
    let mut multipart = multipart.map_err(|err| AppError::Validation(err.body_text()))?;

    let mut overwrite = None;
    let mut dest = None;
    let mut filename = None;
    let mut blob = None;

    // Field order is up to the client, so the blob is buffered and the
    // operation runs only once the whole form has been read.
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::Validation(err.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "overwrite" => overwrite = Some(read_text(field).await?),
            "dest" => dest = Some(read_text(field).await?),
            "filename" => filename = Some(read_text(field).await?),
            "blob" => blob = Some(read_blob(field, state.config.max_file_size).await?),
            _ => {}
        }
    }

    let overwrite = parse_overwrite(&require_trimmed(overwrite, "overwrite")?)?;
    let dest = require_trimmed(dest, "dest")?;
    let filename = require_trimmed(filename, "filename")?;

    state
        .storage
        .create(&dest, &filename, blob.as_deref(), overwrite)
        .await?;
    Ok(Json(ApiResponse::success(Empty {})))
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|err| AppError::Validation(err.to_string()))
}

async fn read_blob(field: Field<'_>, max_size: u64) -> Result<Vec<u8>, AppError> {
    let mut bytes = Vec::new();
    let mut stream = field;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|err| AppError::Validation(err.to_string()))?;
        if (bytes.len() + chunk.len()) as u64 > max_size {
            return Err(AppError::Validation(
                "file exceeds the upload size limit".to_string(),
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn parse_overwrite(value: &str) -> Result<bool, AppError> {
    match value {
        "Y" => Ok(true),
        "N" => Ok(false),
        _ => Err(AppError::Validation(
            "overwrite must be \"Y\" or \"N\"".to_string(),
        )),
    }
}

fn require_trimmed(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(AppError::Validation(format!("{} must not be empty", field))),
    }
}
