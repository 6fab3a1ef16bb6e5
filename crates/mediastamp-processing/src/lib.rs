//! Mediastamp processing library
//!
//! The watermark compositing pipeline and its collaborators: the logo
//! resolver (ordered extension probing against the remote store), the
//! rounded-logo preprocessor, the image compositor, and the video overlay
//! encoder orchestration.
//!
//! Watermarking is strictly best-effort: every public pipeline entry point
//! degrades to the unmodified source on any internal failure. Errors never
//! cross the pipeline boundary.

pub mod image;
pub mod logo;
pub mod pipeline;
pub mod video;

pub use crate::image::roundify::roundify;
pub use crate::image::watermark::{composite, CompositeSpec};
pub use logo::{LogoAsset, LogoResolver, LOGO_EXTENSIONS};
pub use pipeline::{WatermarkPipeline, LOGO_OPACITY, LOGO_PADDING, LOGO_SIZE};
pub use video::encoder::{FfmpegEncoder, OverlayEncoder, OverlaySpec};

/// Corner a composited overlay is anchored to. Offsets in a
/// [`CompositeSpec`]/[`OverlaySpec`] are measured from this corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopRight,
}
