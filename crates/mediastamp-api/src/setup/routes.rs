//! Route table.

use crate::api_doc::ApiDoc;
use crate::handlers::{download, folders, logo, upload};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub fn setup_routes(state: Arc<AppState>) -> Router {
    let max_upload_bytes = state.config.max_upload_size_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/v0/files/move", post(folders::move_file))
        .route("/api/v0/files/{*path}", get(download::download_file))
        .route(
            "/api/v0/organizations/{org}/folders",
            post(folders::create_folder),
        )
        .route(
            "/api/v0/organizations/{org}/folders/{folder}",
            get(folders::list_folder).delete(folders::delete_folder),
        )
        .route(
            "/api/v0/organizations/{org}/folders/{folder}/files",
            post(upload::upload_file),
        )
        .route(
            "/api/v0/organizations/{org}/logo",
            get(logo::get_org_logo)
                .put(logo::put_org_logo)
                .delete(logo::delete_org_logo),
        )
        .route(
            "/api/v0/logo",
            get(logo::get_admin_logo)
                .put(logo::put_admin_logo)
                .delete(logo::delete_admin_logo),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
