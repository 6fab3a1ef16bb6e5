//! Remote store abstraction trait
//!
//! This module defines the RemoteStore trait that all store backends must
//! implement, along with the error and metadata types shared by them.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Store operation errors.
///
/// `NotFound` is the expected negative case and must stay distinguishable
/// from transport/backend failures: callers translate it to 404 (or a benign
/// miss in the logo resolver) while everything else surfaces as a server
/// error.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid store key: {0}")]
    InvalidKey(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Store backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StorageError {
    /// Whether this error means the target object is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Result type for store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// An inclusive byte window into an object, `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn new(start: u64, end: u64) -> Self {
        ByteRange { start, end }
    }

    /// Number of bytes covered by the window.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Object metadata resolved by `stat`.
#[derive(Debug, Clone)]
pub struct ObjectStat {
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// One entry from a directory listing.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Chunked byte stream returned by ranged and unranged reads.
pub type ByteStream = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

/// Remote store capability set.
///
/// All backends must implement this trait so the service can work with any
/// path-addressed store without coupling to backend details. Every operation
/// can fail with a distinguishable `NotFound` versus transport errors.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Check whether an object exists. A missing object is `Ok(false)`,
    /// never an error.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Resolve object metadata (size, last-modified).
    async fn stat(&self, key: &str) -> StorageResult<ObjectStat>;

    /// Full binary read of an object.
    async fn download(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Stream an object's bytes, optionally restricted to a byte window.
    ///
    /// A given range is forwarded to the backend's own range-capable read;
    /// the window is never buffered fully before streaming. Bytes arrive in
    /// ascending offset order.
    async fn download_stream(
        &self,
        key: &str,
        range: Option<ByteRange>,
    ) -> StorageResult<ByteStream>;

    /// Write an object from an in-memory buffer.
    async fn upload(&self, key: &str, content_type: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Write an object from an async reader, for large payloads. Returns the
    /// number of bytes written.
    async fn upload_stream(
        &self,
        key: &str,
        content_type: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64>;

    /// List the objects directly under a prefix.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<StoreEntry>>;

    /// Move an object to a new key.
    async fn rename(&self, from: &str, to: &str) -> StorageResult<()>;

    /// Delete an object. Deleting a missing object is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;
}
