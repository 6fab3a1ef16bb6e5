//! Shared test harness: an in-process server over a local store backend.
#![allow(dead_code)]

use axum_test::TestServer;
use mediastamp_api::setup::routes::setup_routes;
use mediastamp_api::state::AppState;
use mediastamp_core::{Config, StoreBackend};
use mediastamp_processing::{FfmpegEncoder, LogoResolver, OverlayEncoder, WatermarkPipeline};
use mediastamp_storage::{LocalStore, RemoteStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<dyn RemoteStore>,
    pub scratch_path: PathBuf,
    _store_dir: TempDir,
    _scratch_dir: TempDir,
}

fn test_config(store_path: &std::path::Path, scratch_path: &std::path::Path) -> Config {
    Config {
        server_port: 0,
        environment: "test".to_string(),
        store_backend: StoreBackend::Local,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        local_store_path: Some(store_path.to_string_lossy().to_string()),
        store_timeout_secs: 5,
        store_max_connections: 4,
        max_upload_size_bytes: 50 * 1024 * 1024,
        // Deliberately not a real binary: video jobs must degrade, never hang.
        ffmpeg_path: "ffmpeg-unavailable-in-tests".to_string(),
        encode_timeout_secs: 5,
        scratch_dir: Some(scratch_path.to_string_lossy().to_string()),
    }
}

pub async fn spawn_app() -> TestApp {
    let store_dir = tempfile::tempdir().expect("store tempdir");
    let scratch_dir = tempfile::tempdir().expect("scratch tempdir");

    let config = test_config(store_dir.path(), scratch_dir.path());

    let store: Arc<dyn RemoteStore> = Arc::new(
        LocalStore::new(store_dir.path())
            .await
            .expect("local store"),
    );
    let resolver = LogoResolver::new(store.clone());
    let encoder: Arc<dyn OverlayEncoder> = Arc::new(FfmpegEncoder::new(
        config.ffmpeg_path.clone(),
        Duration::from_secs(config.encode_timeout_secs),
    ));
    let watermark = Arc::new(WatermarkPipeline::new(
        resolver.clone(),
        encoder,
        scratch_dir.path().to_path_buf(),
    ));

    let state = Arc::new(AppState {
        config,
        store: store.clone(),
        resolver,
        watermark,
    });

    let server = TestServer::new(setup_routes(state)).expect("test server");

    TestApp {
        server,
        store,
        scratch_path: scratch_dir.path().to_path_buf(),
        _store_dir: store_dir,
        _scratch_dir: scratch_dir,
    }
}

/// Deterministic byte pattern so window comparisons catch off-by-one bugs.
pub fn patterned_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// A solid-color PNG for upload tests.
pub fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    use image::{Rgba, RgbaImage};
    let img = RgbaImage::from_pixel(width, height, Rgba(rgba));
    let mut buffer = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut buffer),
        image::ImageFormat::Png,
    )
    .unwrap();
    buffer
}
