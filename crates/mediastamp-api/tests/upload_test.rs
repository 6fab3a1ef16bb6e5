//! Upload orchestration: watermarking by content type, degradation, and
//! pass-through.

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use helpers::{png_bytes, spawn_app};

fn upload_form(filename: &str, mime: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(data).file_name(filename).mime_type(mime),
    )
}

#[tokio::test]
async fn test_image_upload_is_watermarked_and_stored() {
    let app = spawn_app().await;
    let source = png_bytes(200, 200, [255, 255, 255, 255]);

    let response = app
        .server
        .post("/api/v0/organizations/acme/folders/photos/files")
        .multipart(upload_form("cat.png", "image/png", source.clone()))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["path"], "organizations/acme/photos/cat.png");

    let stored = app
        .store
        .download("organizations/acme/photos/cat.png")
        .await
        .unwrap();
    assert_ne!(stored, source, "stored image must carry the brand mark");

    let img = image::load_from_memory(&stored).unwrap();
    assert_eq!((img.width(), img.height()), (200, 200));
}

#[tokio::test]
async fn test_acme_without_logo_still_succeeds_with_brand_only() {
    let app = spawn_app().await;
    let source = png_bytes(120, 120, [255, 255, 255, 255]);

    let response = app
        .server
        .post("/api/v0/organizations/acme/folders/photos/files")
        .multipart(upload_form("brandonly.png", "image/png", source))
        .await;

    response.assert_status(StatusCode::CREATED);

    let stored = app
        .store
        .download("organizations/acme/photos/brandonly.png")
        .await
        .unwrap();
    let img = image::load_from_memory(&stored).unwrap().to_rgba8();

    // Brand mark top-right; top-left corner area untouched.
    assert!(img.get_pixel(120 - 20 - 25, 45)[0] < 255);
    assert_eq!(img.get_pixel(45, 45)[0], 255);
}

#[tokio::test]
async fn test_corrupt_image_upload_stores_original_bytes() {
    let app = spawn_app().await;
    let garbage = b"this is not a png".to_vec();

    let response = app
        .server
        .post("/api/v0/organizations/acme/folders/photos/files")
        .multipart(upload_form("broken.png", "image/png", garbage.clone()))
        .await;

    response.assert_status(StatusCode::CREATED);
    let stored = app
        .store
        .download("organizations/acme/photos/broken.png")
        .await
        .unwrap();
    assert_eq!(stored, garbage);
}

#[tokio::test]
async fn test_video_upload_with_unavailable_encoder_degrades_cleanly() {
    let app = spawn_app().await;
    let source = b"pretend mp4 payload".to_vec();

    let response = app
        .server
        .post("/api/v0/organizations/acme/folders/clips/files")
        .multipart(upload_form("clip.mp4", "video/mp4", source.clone()))
        .await;

    response.assert_status(StatusCode::CREATED);

    let stored = app
        .store
        .download("organizations/acme/clips/clip.mp4")
        .await
        .unwrap();
    assert_eq!(stored, source);

    // Every scratch artifact is gone after the degraded job.
    let leftovers: Vec<_> = std::fs::read_dir(&app.scratch_path).unwrap().collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_non_media_upload_passes_through() {
    let app = spawn_app().await;
    let payload = b"plain text payload".to_vec();

    let response = app
        .server
        .post("/api/v0/organizations/acme/folders/docs/files")
        .multipart(upload_form("notes.txt", "text/plain", payload.clone()))
        .await;

    response.assert_status(StatusCode::CREATED);
    let stored = app
        .store
        .download("organizations/acme/docs/notes.txt")
        .await
        .unwrap();
    assert_eq!(stored, payload);
}

#[tokio::test]
async fn test_upload_without_file_field_is_400() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/api/v0/organizations/acme/folders/docs/files")
        .multipart(MultipartForm::new().add_text("note", "no file here"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_uploaded_file_roundtrips_through_download() {
    let app = spawn_app().await;
    let payload = b"roundtrip me".to_vec();

    app.server
        .post("/api/v0/organizations/acme/folders/docs/files")
        .multipart(upload_form("data.bin", "application/octet-stream", payload.clone()))
        .await
        .assert_status(StatusCode::CREATED);

    let response = app
        .server
        .get("/api/v0/files/organizations/acme/docs/data.bin")
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.as_bytes().as_ref(), payload.as_slice());
}
