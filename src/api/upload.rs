//! Upload API endpoints
//!
//! POST /api/upload/{bucket} stores one image from the multipart field
//! `file` under `{upload.path}/{bucket}/` and returns its public URL.

use axum::{
    extract::{Multipart, Path, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::path::Path as FsPath;
use tokio::fs;
use uuid::Uuid;

use crate::api::middleware::{ApiError, AppState};
use crate::config::UploadConfig;

/// Response for a stored file
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub path: String,
    pub bucket: String,
    pub size: u64,
    pub content_type: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{bucket}", post(upload_file))
}

async fn upload_file(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let config = &state.upload_config;
    if !config.is_bucket_allowed(&bucket) {
        return Err(ApiError::validation_error(format!("Unknown bucket: {}", bucket)));
    }

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation_error(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        if !config.is_type_allowed(&content_type) {
            return Err(ApiError::validation_error(format!(
                "Invalid file type: {}. Allowed types: {}",
                content_type,
                config.allowed_types.join(", ")
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation_error(format!("Failed to read file: {}", e)))?;

        if data.len() as u64 > config.max_file_size {
            return Err(ApiError::validation_error(format!(
                "File too large. Maximum size: {} MB",
                config.max_file_size / 1024 / 1024
            )));
        }

        let file_name = unique_file_name(config, &content_type);
        let dir = config.path.join(&bucket);
        ensure_dir(&dir).await?;

        fs::write(dir.join(&file_name), &data).await.map_err(|e| {
            tracing::error!("Failed to save upload {}/{}: {}", bucket, file_name, e);
            ApiError::internal_error("Failed to save file")
        })?;

        let path = format!("{}/{}", bucket, file_name);
        tracing::info!("Stored upload {} ({} bytes)", path, data.len());

        return Ok(Json(UploadResponse {
            url: format!("{}/{}", config.public_url.trim_end_matches('/'), path),
            path,
            bucket,
            size: data.len() as u64,
            content_type,
        }));
    }

    Err(ApiError::validation_error("No file provided"))
}

/// `{millis}_{uuid}.{ext}`
fn unique_file_name(config: &UploadConfig, content_type: &str) -> String {
    format!(
        "{}_{}.{}",
        chrono::Utc::now().timestamp_millis(),
        Uuid::new_v4(),
        config.get_extension(content_type)
    )
}

async fn ensure_dir(dir: &FsPath) -> Result<(), ApiError> {
    fs::create_dir_all(dir).await.map_err(|e| {
        tracing::error!("Failed to create upload directory {}: {}", dir.display(), e);
        ApiError::internal_error("Failed to create upload directory")
    })
}
