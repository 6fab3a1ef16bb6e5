//! Image-side watermarking: rounded-logo preprocessing and composition.

pub mod roundify;
pub mod watermark;
