//! Logo management routes: resolution order, replacement policy, admin
//! scope.

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use helpers::{png_bytes, spawn_app};

fn logo_form(filename: &str, mime: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(data).file_name(filename).mime_type(mime),
    )
}

#[tokio::test]
async fn test_absent_logo_is_404() {
    let app = spawn_app().await;
    let response = app.server.get("/api/v0/organizations/acme/logo").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_put_then_get_roundtrips_bytes_and_type() {
    let app = spawn_app().await;
    let logo = png_bytes(64, 64, [0, 0, 0, 255]);

    let response = app
        .server
        .put("/api/v0/organizations/acme/logo")
        .multipart(logo_form("logo.png", "image/png", logo.clone()))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["path"], "organizations/acme/logo.png");

    let response = app.server.get("/api/v0/organizations/acme/logo").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.header("content-type"), "image/png");
    assert_eq!(response.as_bytes().as_ref(), logo.as_slice());
}

#[tokio::test]
async fn test_resolution_prefers_png_over_jpg() {
    let app = spawn_app().await;
    app.store
        .upload("organizations/acme/logo.jpg", "image/jpeg", b"jpg".to_vec())
        .await
        .unwrap();
    app.store
        .upload("organizations/acme/logo.png", "image/png", b"png".to_vec())
        .await
        .unwrap();

    let response = app.server.get("/api/v0/organizations/acme/logo").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.header("content-type"), "image/png");
    assert_eq!(response.as_bytes().as_ref(), b"png".as_slice());
}

#[tokio::test]
async fn test_replacement_clears_stale_variants() {
    let app = spawn_app().await;
    app.store
        .upload("organizations/acme/logo.jpg", "image/jpeg", b"stale".to_vec())
        .await
        .unwrap();

    app.server
        .put("/api/v0/organizations/acme/logo")
        .multipart(logo_form("new.webp", "image/webp", b"fresh".to_vec()))
        .await
        .assert_status_ok();

    assert!(!app
        .store
        .exists("organizations/acme/logo.jpg")
        .await
        .unwrap());
    assert!(app
        .store
        .exists("organizations/acme/logo.webp")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_unsupported_extension_is_400() {
    let app = spawn_app().await;

    let response = app
        .server
        .put("/api/v0/organizations/acme/logo")
        .multipart(logo_form("logo.tiff", "image/tiff", b"tiff".to_vec()))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_removes_all_variants() {
    let app = spawn_app().await;
    app.store
        .upload("organizations/acme/logo.png", "image/png", b"a".to_vec())
        .await
        .unwrap();
    app.store
        .upload("organizations/acme/logo.gif", "image/gif", b"b".to_vec())
        .await
        .unwrap();

    app.server
        .delete("/api/v0/organizations/acme/logo")
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .get("/api/v0/organizations/acme/logo")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_logo_lives_in_singleton_scope() {
    let app = spawn_app().await;
    let logo = png_bytes(32, 32, [10, 20, 30, 255]);

    let response = app
        .server
        .put("/api/v0/logo")
        .multipart(logo_form("logo.png", "image/png", logo.clone()))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["path"], "admin/logo.png");

    let response = app.server.get("/api/v0/logo").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.as_bytes().as_ref(), logo.as_slice());
}
