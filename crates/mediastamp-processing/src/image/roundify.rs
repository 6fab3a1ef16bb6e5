//! Rounded-logo preprocessor.
//!
//! Turns an arbitrary logo image into a square PNG raster masked to a full
//! circle, with its alpha channel scaled to the requested opacity. This is a
//! cosmetic step: decode failures degrade to returning the input unchanged.

use image::{imageops::FilterType, DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

/// Produce a `size`×`size` circular PNG from `source`, at `opacity`.
///
/// The source is fit/cropped to cover the square before masking. On any
/// failure the original bytes come back unchanged.
pub fn roundify(source: &[u8], size: u32, opacity: f32) -> Vec<u8> {
    match try_roundify(source, size, opacity) {
        Ok(png) => png,
        Err(e) => {
            tracing::warn!(error = %e, "Logo roundify failed, using source unchanged");
            source.to_vec()
        }
    }
}

fn try_roundify(source: &[u8], size: u32, opacity: f32) -> Result<Vec<u8>, anyhow::Error> {
    let reader = ImageReader::new(Cursor::new(source)).with_guessed_format()?;
    let img = reader.decode()?;

    let mut square = img.resize_to_fill(size, size, FilterType::Lanczos3).to_rgba8();

    // Corner radius = half the size: a full circle. One pixel of feathering
    // at the rim keeps the edge from aliasing.
    let radius = size as f32 / 2.0;
    let center = (size as f32 - 1.0) / 2.0;
    for (x, y, pixel) in square.enumerate_pixels_mut() {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let dist = (dx * dx + dy * dy).sqrt();
        let mask = if dist <= radius - 1.0 {
            1.0
        } else if dist >= radius {
            0.0
        } else {
            radius - dist
        };
        pixel[3] = (pixel[3] as f32 * mask * opacity).round().clamp(0.0, 255.0) as u8;
    }

    let mut buffer = Vec::new();
    DynamicImage::ImageRgba8(square).write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}
