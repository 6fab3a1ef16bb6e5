//! Logo management.
//!
//! One logo per scope: an organization, or the singleton admin scope. The
//! resolver owns both the probe order and the replacement policy (delete
//! every extension variant before writing the new one).

use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::upload::validate_segment;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use mediastamp_core::{mime_for_path, AppError};
use mediastamp_storage::keys;
use mediastamp_processing::LOGO_EXTENSIONS;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoResponse {
    /// Store path the logo was written to
    pub path: String,
}

async fn fetch_logo(state: &AppState, scope: &str) -> Result<Response, HttpAppError> {
    let logo = state
        .resolver
        .resolve(scope)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No logo for scope {}", scope)))?;

    let content_type = mime_for_path(&format!("logo{}", logo.extension));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, logo.bytes.len())
        .body(Body::from(logo.bytes))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)).into())
}

async fn store_logo(
    state: &AppState,
    scope: &str,
    mut multipart: Multipart,
) -> Result<Json<LogoResponse>, HttpAppError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart body: {}", e)))?
        .ok_or_else(|| AppError::InvalidInput("Missing logo file".to_string()))?;

    let filename = field.file_name().unwrap_or("logo").to_string();
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default();

    if !LOGO_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::InvalidInput(format!(
            "Unsupported logo extension: {:?} (expected one of {})",
            extension,
            LOGO_EXTENSIONS.join(", ")
        ))
        .into());
    }

    let content_type = field
        .content_type()
        .map(str::to_string)
        .unwrap_or_else(|| mime_for_path(&filename).to_string());
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read logo: {}", e)))?;

    let path = state
        .resolver
        .replace(scope, &extension, &content_type, data.to_vec())
        .await?;

    Ok(Json(LogoResponse { path }))
}

#[utoipa::path(
    get,
    path = "/api/v0/organizations/{org}/logo",
    tag = "logos",
    params(("org" = String, Path, description = "Organization identifier")),
    responses(
        (status = 200, description = "Logo bytes"),
        (status = 404, description = "No logo for this organization", body = ErrorResponse)
    )
)]
pub async fn get_org_logo(
    State(state): State<Arc<AppState>>,
    Path(org): Path<String>,
) -> Result<Response, HttpAppError> {
    validate_segment(&org, "organization")?;
    fetch_logo(&state, &keys::organization_scope(&org)).await
}

#[utoipa::path(
    put,
    path = "/api/v0/organizations/{org}/logo",
    tag = "logos",
    params(("org" = String, Path, description = "Organization identifier")),
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Logo replaced", body = LogoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn put_org_logo(
    State(state): State<Arc<AppState>>,
    Path(org): Path<String>,
    multipart: Multipart,
) -> Result<Json<LogoResponse>, HttpAppError> {
    validate_segment(&org, "organization")?;
    store_logo(&state, &keys::organization_scope(&org), multipart).await
}

#[utoipa::path(
    delete,
    path = "/api/v0/organizations/{org}/logo",
    tag = "logos",
    params(("org" = String, Path, description = "Organization identifier")),
    responses((status = 204, description = "Logo removed"))
)]
pub async fn delete_org_logo(
    State(state): State<Arc<AppState>>,
    Path(org): Path<String>,
) -> Result<StatusCode, HttpAppError> {
    validate_segment(&org, "organization")?;
    state
        .resolver
        .remove(&keys::organization_scope(&org))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v0/logo",
    tag = "logos",
    responses(
        (status = 200, description = "Admin logo bytes"),
        (status = 404, description = "No admin logo", body = ErrorResponse)
    )
)]
pub async fn get_admin_logo(
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpAppError> {
    fetch_logo(&state, keys::ADMIN_SCOPE).await
}

#[utoipa::path(
    put,
    path = "/api/v0/logo",
    tag = "logos",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Admin logo replaced", body = LogoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn put_admin_logo(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<LogoResponse>, HttpAppError> {
    store_logo(&state, keys::ADMIN_SCOPE, multipart).await
}

#[utoipa::path(
    delete,
    path = "/api/v0/logo",
    tag = "logos",
    responses((status = 204, description = "Admin logo removed"))
)]
pub async fn delete_admin_logo(
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, HttpAppError> {
    state.resolver.remove(keys::ADMIN_SCOPE).await?;
    Ok(StatusCode::NO_CONTENT)
}
