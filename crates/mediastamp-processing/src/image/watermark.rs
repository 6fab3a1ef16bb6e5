//! Two-layer overlay composition for still images.
//!
//! Takes the source image plus an ordered list of prepared overlay rasters
//! and produces the composited image re-encoded in the source's native
//! container where feasible. Alpha-less containers (JPEG) are flattened to
//! RGB before encoding; containers the encoder side does not handle fall
//! back to PNG.

use crate::Anchor;
use anyhow::{anyhow, Context, Result};
use image::{imageops, DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

/// One overlay to composite: a decoded-on-demand raster, its anchor corner,
/// and pixel offsets from that corner.
#[derive(Debug, Clone)]
pub struct CompositeSpec {
    pub overlay: Vec<u8>,
    pub anchor: Anchor,
    pub dx: u32,
    pub dy: u32,
}

/// Composite `specs` over `source` in order, returning the result encoded in
/// the source's container.
pub fn composite(source: &[u8], specs: &[CompositeSpec]) -> Result<Vec<u8>> {
    let reader = ImageReader::new(Cursor::new(source))
        .with_guessed_format()
        .context("Failed to probe image container")?;
    let format = reader
        .format()
        .ok_or_else(|| anyhow!("Unrecognized image container"))?;
    let mut base = reader.decode().context("Failed to decode source image")?.to_rgba8();

    let (width, _height) = base.dimensions();

    for spec in specs {
        let overlay = image::load_from_memory(&spec.overlay)
            .context("Failed to decode overlay raster")?
            .to_rgba8();
        let (ow, _oh) = overlay.dimensions();

        let (x, y) = match spec.anchor {
            Anchor::TopLeft => (spec.dx as i64, spec.dy as i64),
            Anchor::TopRight => (
                (width as i64 - ow as i64 - spec.dx as i64).max(0),
                spec.dy as i64,
            ),
        };

        imageops::overlay(&mut base, &overlay, x, y);
    }

    encode_native(DynamicImage::ImageRgba8(base), format)
}

/// Encode in the source container where the encoder supports it; flatten
/// alpha for JPEG; otherwise fall back to PNG.
fn encode_native(img: DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);

    match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8())
            .write_to(&mut cursor, ImageFormat::Jpeg)
            .context("Failed to encode JPEG")?,
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Gif | ImageFormat::Bmp => img
            .write_to(&mut cursor, format)
            .context("Failed to encode image")?,
        _ => img
            .write_to(&mut cursor, ImageFormat::Png)
            .context("Failed to encode fallback PNG")?,
    }

    Ok(buffer)
}
