//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; any
//! `AppError` (or type convertible into one) becomes a consistent JSON
//! error body with the status, code, and logging level its metadata
//! declares. Store errors are translated here so `NotFound` maps to 404 and
//! transport failures stay generic toward the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mediastamp_core::{AppError, ErrorMetadata, LogLevel};
use mediastamp_storage::StorageError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse. Needed because of
/// the orphan rule: IntoResponse (external trait) cannot be implemented for
/// AppError (external type from mediastamp-core) directly.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(storage_to_app_error(err))
    }
}

/// Translate a store error into the app taxonomy: absence is 404, bad keys
/// are client errors, everything else is a transport failure the client
/// only sees generically.
pub fn storage_to_app_error(err: StorageError) -> AppError {
    match err {
        StorageError::NotFound(key) => AppError::NotFound(format!("File not found: {}", key)),
        StorageError::InvalidKey(key) => AppError::InvalidInput(format!("Invalid path: {}", key)),
        other => AppError::Store(other.to_string()),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let err = self.0;

        match err.log_level() {
            LogLevel::Debug => tracing::debug!(error = %err.detailed_message(), "Request failed"),
            LogLevel::Warn => tracing::warn!(error = %err.detailed_message(), "Request failed"),
            LogLevel::Error => tracing::error!(error = %err.detailed_message(), "Request failed"),
        }

        let status = StatusCode::from_u16(err.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse::new(err.client_message(), err.error_code());

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_not_found_maps_to_404() {
        let app = storage_to_app_error(StorageError::NotFound("a/b.mp4".into()));
        assert_eq!(app.http_status_code(), 404);
    }

    #[test]
    fn test_storage_transport_maps_to_500_with_generic_message() {
        let app = storage_to_app_error(StorageError::BackendError("tls handshake".into()));
        assert_eq!(app.http_status_code(), 500);
        assert_eq!(app.client_message(), "Failed to access storage");
    }

    #[test]
    fn test_invalid_key_is_a_client_error() {
        let app = storage_to_app_error(StorageError::InvalidKey("../x".into()));
        assert_eq!(app.http_status_code(), 400);
    }
}
