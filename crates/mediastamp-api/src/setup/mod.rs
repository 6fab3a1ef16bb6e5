//! Application setup and initialization
//!
//! All initialization logic lives here rather than in main.rs: telemetry,
//! the store backend, the watermark pipeline, and the router.

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use mediastamp_core::Config;
use mediastamp_processing::{FfmpegEncoder, LogoResolver, OverlayEncoder, WatermarkPipeline};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let store = storage::setup_store(&config).await?;

    let resolver = LogoResolver::new(store.clone());
    let encoder: Arc<dyn OverlayEncoder> = Arc::new(FfmpegEncoder::new(
        config.ffmpeg_path.clone(),
        Duration::from_secs(config.encode_timeout_secs),
    ));
    let scratch_root = config
        .scratch_dir
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    let watermark = Arc::new(WatermarkPipeline::new(
        resolver.clone(),
        encoder,
        scratch_root,
    ));

    let state = Arc::new(AppState {
        config,
        store,
        resolver,
        watermark,
    });

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
