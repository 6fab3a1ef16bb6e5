//! Upload orchestrator.
//!
//! Receives a multipart file for an organization subfolder, runs it through
//! the watermark pipeline selected by declared content type (`image/*`,
//! `video/*`, anything else passes through), and writes the result to the
//! store at a deterministic path. Watermark failures never fail the upload;
//! the pipeline degrades to the original bytes internally.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use mediastamp_core::{mime_for_path, AppError};
use mediastamp_storage::keys;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Final store path of the persisted object
    pub path: String,
    pub size: u64,
    pub content_type: String,
}

/// Reject path segments that would break out of the organization tree.
pub(crate) fn validate_segment(value: &str, what: &str) -> Result<(), AppError> {
    if value.is_empty() || value.contains('/') || value.contains("..") || value.contains('\\') {
        return Err(AppError::InvalidInput(format!("Invalid {}: {}", what, value)));
    }
    Ok(())
}

/// Pull the first file field out of a multipart body.
async fn read_file_field(
    mut multipart: Multipart,
) -> Result<(String, String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart body: {}", e)))?
    {
        if field.file_name().is_none() && field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("file").to_string();
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| mime_for_path(&filename).to_string());

        let data = field.bytes().await.map_err(|e| {
            let detail = e.to_string();
            if detail.contains("length limit") {
                AppError::PayloadTooLarge(detail)
            } else {
                AppError::InvalidInput(format!("Failed to read upload: {}", detail))
            }
        })?;

        return Ok((filename, content_type, data.to_vec()));
    }

    Err(AppError::InvalidInput(
        "Missing file field in multipart body".to_string(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v0/organizations/{org}/folders/{folder}/files",
    tag = "files",
    params(
        ("org" = String, Path, description = "Organization identifier"),
        ("folder" = String, Path, description = "Target subfolder")
    ),
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    Path((org, folder)): Path<(String, String)>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), HttpAppError> {
    validate_segment(&org, "organization")?;
    validate_segment(&folder, "folder")?;

    let (filename, content_type, data) = read_file_field(multipart).await?;
    let filename = keys::sanitize_filename(&filename);
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    let scope = keys::organization_scope(&org);
    let original_size = data.len();

    let stamped = state
        .watermark
        .process(&content_type, &extension, &scope, data)
        .await;

    let key = keys::file_key(&org, &folder, &filename);
    let size = stamped.len() as u64;

    state.store.upload(&key, &content_type, stamped).await?;

    tracing::info!(
        org = %org,
        key = %key,
        content_type = %content_type,
        original_bytes = original_size,
        stored_bytes = size,
        "Upload stored"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            path: key,
            size,
            content_type,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_segment_rejects_traversal() {
        assert!(validate_segment("acme", "organization").is_ok());
        assert!(validate_segment("", "organization").is_err());
        assert!(validate_segment("a/b", "folder").is_err());
        assert!(validate_segment("..", "folder").is_err());
    }
}
