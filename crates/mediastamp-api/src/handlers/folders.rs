//! Thin folder and move routes.
//!
//! These are boundary operations with no algorithmic content: key
//! construction plus one store call each. Folder creation writes a marker
//! object since object stores have no real directories.

use crate::error::{storage_to_app_error, ErrorResponse, HttpAppError};
use crate::handlers::upload::validate_segment;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use mediastamp_core::AppError;
use mediastamp_storage::keys;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Marker object that makes an empty folder listable.
const FOLDER_MARKER: &str = ".keep";

#[derive(Debug, Serialize, ToSchema)]
pub struct FolderEntry {
    pub path: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFolderRequest {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FolderResponse {
    pub path: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
}

#[utoipa::path(
    get,
    path = "/api/v0/organizations/{org}/folders/{folder}",
    tag = "folders",
    params(
        ("org" = String, Path, description = "Organization identifier"),
        ("folder" = String, Path, description = "Folder name")
    ),
    responses(
        (status = 200, description = "Folder contents", body = [FolderEntry]),
        (status = 404, description = "Folder not found", body = ErrorResponse)
    )
)]
pub async fn list_folder(
    State(state): State<Arc<AppState>>,
    Path((org, folder)): Path<(String, String)>,
) -> Result<Json<Vec<FolderEntry>>, HttpAppError> {
    validate_segment(&org, "organization")?;
    validate_segment(&folder, "folder")?;

    let entries = state
        .store
        .list(&keys::folder_key(&org, &folder))
        .await
        .map_err(storage_to_app_error)?;

    let entries = entries
        .into_iter()
        .filter(|e| !e.key.ends_with(FOLDER_MARKER))
        .map(|e| FolderEntry {
            path: e.key,
            size: e.size,
            last_modified: e.last_modified,
        })
        .collect();

    Ok(Json(entries))
}

#[utoipa::path(
    post,
    path = "/api/v0/organizations/{org}/folders",
    tag = "folders",
    params(("org" = String, Path, description = "Organization identifier")),
    request_body = CreateFolderRequest,
    responses(
        (status = 201, description = "Folder created", body = FolderResponse),
        (status = 400, description = "Invalid folder name", body = ErrorResponse)
    )
)]
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    Path(org): Path<String>,
    Json(request): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<FolderResponse>), HttpAppError> {
    validate_segment(&org, "organization")?;
    validate_segment(&request.name, "folder")?;

    let path = keys::folder_key(&org, &request.name);
    let marker = format!("{}/{}", path, FOLDER_MARKER);
    state
        .store
        .upload(&marker, "application/octet-stream", Vec::new())
        .await?;

    Ok((StatusCode::CREATED, Json(FolderResponse { path })))
}

#[utoipa::path(
    delete,
    path = "/api/v0/organizations/{org}/folders/{folder}",
    tag = "folders",
    params(
        ("org" = String, Path, description = "Organization identifier"),
        ("folder" = String, Path, description = "Folder name")
    ),
    responses(
        (status = 204, description = "Folder deleted"),
        (status = 404, description = "Folder not found", body = ErrorResponse)
    )
)]
pub async fn delete_folder(
    State(state): State<Arc<AppState>>,
    Path((org, folder)): Path<(String, String)>,
) -> Result<StatusCode, HttpAppError> {
    validate_segment(&org, "organization")?;
    validate_segment(&folder, "folder")?;

    let prefix = keys::folder_key(&org, &folder);
    let entries = state
        .store
        .list(&prefix)
        .await
        .map_err(storage_to_app_error)?;

    for entry in &entries {
        state.store.delete(&entry.key).await?;
    }
    // The marker is part of the listing on object stores but not on all
    // backends; clear it explicitly.
    state
        .store
        .delete(&format!("{}/{}", prefix, FOLDER_MARKER))
        .await?;

    tracing::info!(org = %org, folder = %folder, removed = entries.len(), "Folder deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v0/files/move",
    tag = "files",
    request_body = MoveRequest,
    responses(
        (status = 200, description = "Object moved", body = FolderResponse),
        (status = 404, description = "Source not found", body = ErrorResponse)
    )
)]
pub async fn move_file(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<FolderResponse>, HttpAppError> {
    if request.from.trim().is_empty() || request.to.trim().is_empty() {
        return Err(AppError::InvalidInput("Missing move source or target".to_string()).into());
    }

    state
        .store
        .rename(&request.from, &request.to)
        .await
        .map_err(storage_to_app_error)?;

    Ok(Json(FolderResponse { path: request.to }))
}
