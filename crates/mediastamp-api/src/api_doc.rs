//! OpenAPI document aggregation.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mediastamp API",
        description = "Media ingestion and delivery proxy with watermark stamping and byte-range streaming"
    ),
    paths(
        crate::handlers::download::download_file,
        crate::handlers::upload::upload_file,
        crate::handlers::logo::get_org_logo,
        crate::handlers::logo::put_org_logo,
        crate::handlers::logo::delete_org_logo,
        crate::handlers::logo::get_admin_logo,
        crate::handlers::logo::put_admin_logo,
        crate::handlers::logo::delete_admin_logo,
        crate::handlers::folders::list_folder,
        crate::handlers::folders::create_folder,
        crate::handlers::folders::delete_folder,
        crate::handlers::folders::move_file,
    ),
    components(schemas(
        crate::error::ErrorResponse,
        crate::handlers::upload::UploadResponse,
        crate::handlers::logo::LogoResponse,
        crate::handlers::folders::FolderEntry,
        crate::handlers::folders::CreateFolderRequest,
        crate::handlers::folders::FolderResponse,
        crate::handlers::folders::MoveRequest,
    )),
    tags(
        (name = "files", description = "Streaming reads, uploads, and moves"),
        (name = "logos", description = "Per-scope logo management"),
        (name = "folders", description = "Folder lifecycle")
    )
)]
pub struct ApiDoc;
