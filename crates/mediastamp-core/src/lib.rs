//! Mediastamp core library
//!
//! Shared foundation for the mediastamp workspace: configuration loaded from
//! the environment, the error taxonomy used across crates, and MIME
//! classification for store paths.

pub mod config;
pub mod error;
pub mod mime;

pub use config::{Config, StoreBackend};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use mime::mime_for_path;
