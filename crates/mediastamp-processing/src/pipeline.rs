//! Watermark pipeline façade.
//!
//! One entry point per media class plus a content-type dispatcher. Both
//! variants compose the bundled brand logo (always, top-right) and the
//! tenant logo when one resolves (top-left), at the same pixel padding.
//!
//! Failure semantics: the pipeline never raises to its caller. Any internal
//! failure - resolver transport error, decode error, encoder failure -
//! degrades the job to the unmodified source and logs a warning.

use crate::image::roundify::roundify;
use crate::image::watermark::{composite, CompositeSpec};
use crate::logo::LogoResolver;
use crate::video::encoder::OverlayEncoder;
use crate::video::watermark::overlay_video;
use crate::Anchor;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Edge length of the composited logo rasters, in pixels.
pub const LOGO_SIZE: u32 = 50;
/// Pixel padding between a logo and its anchor corner.
pub const LOGO_PADDING: u32 = 20;
/// Alpha applied to both logo rasters.
pub const LOGO_OPACITY: f32 = 0.8;

/// The fixed brand overlay applied to all tenants' media.
pub const BRAND_LOGO: &[u8] = include_bytes!("../assets/brand-logo.png");

pub struct WatermarkPipeline {
    resolver: LogoResolver,
    encoder: Arc<dyn OverlayEncoder>,
    scratch_root: PathBuf,
}

impl WatermarkPipeline {
    pub fn new(
        resolver: LogoResolver,
        encoder: Arc<dyn OverlayEncoder>,
        scratch_root: PathBuf,
    ) -> Self {
        WatermarkPipeline {
            resolver,
            encoder,
            scratch_root,
        }
    }

    /// Dispatch on the declared content type: images and videos get
    /// watermarked, everything else passes through unmodified.
    pub async fn process(
        &self,
        content_type: &str,
        extension: &str,
        scope: &str,
        data: Vec<u8>,
    ) -> Vec<u8> {
        if content_type.starts_with("image/") {
            self.watermark_image(data, scope).await
        } else if content_type.starts_with("video/") {
            self.watermark_video(data, scope, extension).await
        } else {
            data
        }
    }

    /// Watermark a still image. Returns the source unchanged on any failure.
    pub async fn watermark_image(&self, source: Vec<u8>, scope: &str) -> Vec<u8> {
        match self.try_watermark_image(&source, scope).await {
            Ok(out) => out,
            Err(e) => {
                tracing::warn!(
                    scope = %scope,
                    error = %format!("{:#}", e),
                    "Image watermark failed, keeping original"
                );
                source
            }
        }
    }

    async fn try_watermark_image(&self, source: &[u8], scope: &str) -> Result<Vec<u8>> {
        let mut specs = vec![CompositeSpec {
            overlay: roundify(BRAND_LOGO, LOGO_SIZE, LOGO_OPACITY),
            anchor: Anchor::TopRight,
            dx: LOGO_PADDING,
            dy: LOGO_PADDING,
        }];

        if let Some(logo) = self.resolver.resolve(scope).await? {
            specs.push(CompositeSpec {
                overlay: roundify(&logo.bytes, LOGO_SIZE, LOGO_OPACITY),
                anchor: Anchor::TopLeft,
                dx: LOGO_PADDING,
                dy: LOGO_PADDING,
            });
        }

        composite(source, &specs)
    }

    /// Watermark a video through the external encoder. Returns the source
    /// unchanged on any failure, including encoder death and timeout; all
    /// scratch files are gone either way.
    pub async fn watermark_video(&self, source: Vec<u8>, scope: &str, extension: &str) -> Vec<u8> {
        match self.try_watermark_video(&source, scope, extension).await {
            Ok(out) => out,
            Err(e) => {
                tracing::warn!(
                    scope = %scope,
                    error = %format!("{:#}", e),
                    "Video watermark failed, keeping original"
                );
                source
            }
        }
    }

    async fn try_watermark_video(
        &self,
        source: &[u8],
        scope: &str,
        extension: &str,
    ) -> Result<Vec<u8>> {
        let brand = roundify(BRAND_LOGO, LOGO_SIZE, LOGO_OPACITY);
        let tenant = self
            .resolver
            .resolve(scope)
            .await?
            .map(|logo| roundify(&logo.bytes, LOGO_SIZE, LOGO_OPACITY));

        overlay_video(
            self.encoder.as_ref(),
            &self.scratch_root,
            source,
            extension,
            &brand,
            tenant.as_deref(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::encoder::OverlaySpec;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use image::{ImageFormat, Rgba, RgbaImage};
    use mediastamp_storage::{LocalStore, RemoteStore};
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::tempdir;

    struct NoEncoder;

    #[async_trait]
    impl OverlayEncoder for NoEncoder {
        async fn compose_overlays(
            &self,
            _base: &Path,
            _overlays: &[OverlaySpec],
            _output: &Path,
        ) -> Result<()> {
            Err(anyhow!("no encoder in this test"))
        }
    }

    async fn pipeline_with(
        store_dir: &tempfile::TempDir,
        scratch_dir: &tempfile::TempDir,
    ) -> (WatermarkPipeline, Arc<dyn RemoteStore>) {
        let store: Arc<dyn RemoteStore> =
            Arc::new(LocalStore::new(store_dir.path()).await.unwrap());
        let pipeline = WatermarkPipeline::new(
            LogoResolver::new(store.clone()),
            Arc::new(NoEncoder),
            scratch_dir.path().to_path_buf(),
        );
        (pipeline, store)
    }

    fn white_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[tokio::test]
    async fn test_image_without_tenant_logo_gets_brand_only() {
        let store_dir = tempdir().unwrap();
        let scratch_dir = tempdir().unwrap();
        let (pipeline, _) = pipeline_with(&store_dir, &scratch_dir).await;

        let source = white_png(200, 200);
        let out = pipeline.watermark_image(source.clone(), "organizations/acme").await;

        assert_ne!(out, source);
        let img = image::load_from_memory(&out).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (200, 200));

        // Brand circle center sits at (200 - 20 - 25, 20 + 25); the dark
        // mark at 0.8 opacity must have darkened the white background.
        let stamped = img.get_pixel(155, 45);
        assert!(stamped[0] < 255);
        // Top-left corner stays untouched without a tenant logo.
        assert_eq!(img.get_pixel(45, 45), &Rgba([255, 255, 255, 255]));
    }

    #[tokio::test]
    async fn test_image_with_tenant_logo_gets_both_marks() {
        let store_dir = tempdir().unwrap();
        let scratch_dir = tempdir().unwrap();
        let (pipeline, store) = pipeline_with(&store_dir, &scratch_dir).await;

        // A dark logo so the top-left stamp is measurable over white.
        let dark = {
            let img = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 255]));
            let mut buffer = Vec::new();
            img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
                .unwrap();
            buffer
        };
        store
            .upload("organizations/acme/logo.png", "image/png", dark)
            .await
            .unwrap();

        let out = pipeline
            .watermark_image(white_png(200, 200), "organizations/acme")
            .await;
        let img = image::load_from_memory(&out).unwrap().to_rgba8();

        let tenant_stamp = img.get_pixel(45, 45);
        assert!(tenant_stamp[0] < 255);
        let brand_stamp = img.get_pixel(155, 45);
        assert!(brand_stamp[0] < 255);
    }

    #[tokio::test]
    async fn test_corrupt_image_degrades_to_original() {
        let store_dir = tempdir().unwrap();
        let scratch_dir = tempdir().unwrap();
        let (pipeline, _) = pipeline_with(&store_dir, &scratch_dir).await;

        let garbage = b"not an image at all".to_vec();
        let out = pipeline.watermark_image(garbage.clone(), "organizations/acme").await;
        assert_eq!(out, garbage);
    }

    #[tokio::test]
    async fn test_video_encoder_failure_degrades_and_leaves_no_scratch() {
        let store_dir = tempdir().unwrap();
        let scratch_dir = tempdir().unwrap();
        let (pipeline, _) = pipeline_with(&store_dir, &scratch_dir).await;

        let source = b"pretend this is an mp4".to_vec();
        let out = pipeline
            .watermark_video(source.clone(), "organizations/acme", "mp4")
            .await;

        assert_eq!(out, source);
        let leftovers: Vec<_> = std::fs::read_dir(scratch_dir.path()).unwrap().collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_process_dispatches_by_content_type() {
        let store_dir = tempdir().unwrap();
        let scratch_dir = tempdir().unwrap();
        let (pipeline, _) = pipeline_with(&store_dir, &scratch_dir).await;

        // Non-media content passes through untouched.
        let text = b"plain text payload".to_vec();
        let out = pipeline
            .process("text/plain", "txt", "organizations/acme", text.clone())
            .await;
        assert_eq!(out, text);

        // Image content gets composited.
        let source = white_png(120, 120);
        let out = pipeline
            .process("image/png", "png", "organizations/acme", source.clone())
            .await;
        assert_ne!(out, source);
    }
}
