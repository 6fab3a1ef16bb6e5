//! Scratch-file orchestration for the video overlay job.
//!
//! Video overlaying works through temporary filesystem locations: the source
//! and the logo rasters are materialized into a per-job scratch directory,
//! the encoder runs against them, and the whole directory is removed on
//! every exit path. Job directories carry a unique suffix so concurrent jobs
//! never collide.

use super::encoder::{OverlayEncoder, OverlaySpec};
use crate::{Anchor, LOGO_PADDING};
use anyhow::{Context, Result};
use std::path::Path;
use uuid::Uuid;

/// Run one overlay job: materialize inputs under a fresh scratch directory,
/// invoke the encoder, read back the output.
///
/// The scratch directory is deleted when this function returns, success or
/// not; the only bytes that outlive the job are the returned output.
pub async fn overlay_video(
    encoder: &dyn OverlayEncoder,
    scratch_root: &Path,
    source: &[u8],
    extension: &str,
    brand_raster: &[u8],
    tenant_raster: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let ext = if extension.is_empty() { "mp4" } else { extension };

    let scratch = tempfile::Builder::new()
        .prefix(&format!("stamp-{}-", Uuid::new_v4()))
        .tempdir_in(scratch_root)
        .context("Failed to create scratch directory")?;
    let dir = scratch.path();

    let input_path = dir.join(format!("input.{}", ext));
    let output_path = dir.join(format!("output.{}", ext));

    tokio::fs::write(&input_path, source)
        .await
        .context("Failed to materialize source video")?;

    let brand_path = dir.join("brand_logo.png");
    tokio::fs::write(&brand_path, brand_raster)
        .await
        .context("Failed to materialize brand logo raster")?;

    let mut overlays = vec![OverlaySpec {
        path: brand_path,
        anchor: Anchor::TopRight,
        padding: LOGO_PADDING,
    }];

    if let Some(raster) = tenant_raster {
        let tenant_path = dir.join("tenant_logo.png");
        tokio::fs::write(&tenant_path, raster)
            .await
            .context("Failed to materialize tenant logo raster")?;
        overlays.push(OverlaySpec {
            path: tenant_path,
            anchor: Anchor::TopLeft,
            padding: LOGO_PADDING,
        });
    }

    encoder
        .compose_overlays(&input_path, &overlays, &output_path)
        .await?;

    let output = tokio::fs::read(&output_path)
        .await
        .context("Failed to read encoder output")?;

    scratch
        .close()
        .context("Failed to remove scratch directory")?;

    Ok(output)
}
