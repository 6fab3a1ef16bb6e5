//! Byte-range streaming responder.
//!
//! Translates a store path plus an optional `Range` header into a correctly
//! framed 200 or 206 response whose body streams straight from the remote
//! store. The requested window is forwarded to the store's own
//! range-capable read; nothing is buffered client-side. Once headers are
//! committed, a mid-stream read failure terminates the body; no second
//! header write is ever attempted.

use crate::error::{storage_to_app_error, ErrorResponse, HttpAppError};
use crate::range::{parse_range_header, RangeRequest};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use mediastamp_core::{mime_for_path, AppError};
use mediastamp_storage::ByteRange;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v0/files/{path}",
    tag = "files",
    params(
        ("path" = String, Path, description = "Store path of the object"),
        ("Range" = Option<String>, Header, description = "Optional byte range, e.g. bytes=0-1023")
    ),
    responses(
        (status = 200, description = "Whole object"),
        (status = 206, description = "Requested byte window"),
        (status = 400, description = "Missing path or malformed range", body = ErrorResponse),
        (status = 404, description = "Object not found", body = ErrorResponse),
        (status = 416, description = "Range start past end of object", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    let path = path.trim_start_matches('/').to_string();
    if path.trim().is_empty() {
        return Err(AppError::InvalidInput("Missing file path".to_string()).into());
    }

    let stat = state
        .store
        .stat(&path)
        .await
        .map_err(storage_to_app_error)?;
    let content_type = mime_for_path(&path);

    let range_header = match headers.get(header::RANGE) {
        None => None,
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| AppError::InvalidInput("Malformed Range header".to_string()))?
                .to_string(),
        ),
    };

    match range_header {
        None => {
            let stream = state
                .store
                .download_stream(&path, None)
                .await
                .map_err(storage_to_app_error)?;
            let body = Body::from_stream(
                stream.map(|chunk| chunk.map_err(|e| std::io::Error::other(e.to_string()))),
            );

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_LENGTH, stat.size)
                .header(header::ACCEPT_RANGES, "bytes")
                .body(body)
                .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)).into())
        }
        Some(value) => {
            let window: RangeRequest = match parse_range_header(&value, stat.size) {
                Ok(window) => window,
                Err(AppError::RangeNotSatisfiable(msg)) => {
                    return Ok(unsatisfiable_response(stat.size, msg));
                }
                Err(e) => return Err(e.into()),
            };

            tracing::debug!(
                path = %path,
                start = window.start,
                end = window.end,
                total = window.total,
                "Serving partial content"
            );

            let stream = state
                .store
                .download_stream(&path, Some(ByteRange::new(window.start, window.end)))
                .await
                .map_err(storage_to_app_error)?;
            let body = Body::from_stream(
                stream.map(|chunk| chunk.map_err(|e| std::io::Error::other(e.to_string()))),
            );

            Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_RANGE, window.content_range())
                .header(header::CONTENT_LENGTH, window.len())
                .header(header::ACCEPT_RANGES, "bytes")
                .body(body)
                .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)).into())
        }
    }
}

/// 416 with `Content-Range: bytes */{total}` so the client learns the
/// object size.
fn unsatisfiable_response(total: u64, message: String) -> Response {
    let mut response = (
        StatusCode::RANGE_NOT_SATISFIABLE,
        Json(ErrorResponse::new(message, "RANGE_NOT_SATISFIABLE")),
    )
        .into_response();
    if let Ok(value) = format!("bytes */{}", total).parse() {
        response
            .headers_mut()
            .insert(header::CONTENT_RANGE, value);
    }
    response
}
