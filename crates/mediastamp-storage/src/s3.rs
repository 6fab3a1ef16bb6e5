//! S3-compatible store backend.
//!
//! Built on `object_store`'s Amazon S3 implementation. Ranged reads are
//! forwarded as range GETs so partial-content responses never buffer the
//! window client-side. The underlying HTTP client carries a bounded request
//! timeout and a pooled-connection ceiling.

use crate::traits::{
    ByteRange, ByteStream, ObjectStat, RemoteStore, StorageError, StorageResult, StoreEntry,
};
use async_trait::async_trait;
use futures::StreamExt;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::{
    Attribute, Attributes, ClientOptions, Error as ObjectStoreError, GetOptions, GetRange,
    ObjectStore, ObjectStoreExt, PutOptions, PutPayload, WriteMultipart,
};
use std::pin::Pin;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};

const STREAM_UPLOAD_CHUNK: usize = 1024 * 1024;

#[derive(Clone)]
pub struct S3Store {
    store: AmazonS3,
    bucket: String,
}

impl S3Store {
    /// Create a new S3Store.
    ///
    /// Credentials come from the environment (the configuration layer has
    /// already validated they are present). `endpoint_url` selects an
    /// S3-compatible provider (MinIO, Spaces); `timeout` and
    /// `max_connections` bound the pooled HTTP client.
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        timeout: Duration,
        max_connections: usize,
    ) -> StorageResult<Self> {
        let client_options = ClientOptions::new()
            .with_timeout(timeout)
            .with_pool_idle_timeout(timeout)
            .with_pool_max_idle_per_host(max_connections);

        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone())
            .with_client_options(client_options);

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Store { store, bucket })
    }

    fn map_get_error(key: &str, err: ObjectStoreError) -> StorageError {
        match err {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => StorageError::DownloadFailed(other.to_string()),
        }
    }
}

#[async_trait]
impl RemoteStore for S3Store {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let location = Path::from(key);
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    async fn stat(&self, key: &str) -> StorageResult<ObjectStat> {
        let location = Path::from(key);
        let meta = self.store.head(&location).await.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => {
                tracing::error!(bucket = %self.bucket, key = %key, error = %other, "S3 stat failed");
                StorageError::BackendError(other.to_string())
            }
        })?;

        Ok(ObjectStat {
            size: meta.size,
            last_modified: Some(meta.last_modified),
        })
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        let start = std::time::Instant::now();
        let location = Path::from(key);

        let result = self
            .store
            .get(&location)
            .await
            .map_err(|e| Self::map_get_error(key, e))?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = bytes.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(bytes.to_vec())
    }

    async fn download_stream(
        &self,
        key: &str,
        range: Option<ByteRange>,
    ) -> StorageResult<ByteStream> {
        let location = Path::from(key);

        let options = GetOptions {
            range: range.map(|w| GetRange::Bounded(w.start..w.end + 1)),
            ..Default::default()
        };

        let result = self
            .store
            .get_opts(&location, options)
            .await
            .map_err(|e| Self::map_get_error(key, e))?;

        let owned_key = key.to_string();
        let bucket = self.bucket.clone();
        let stream = result.into_stream().map(move |chunk| {
            chunk.map_err(|e| {
                tracing::error!(bucket = %bucket, key = %owned_key, error = %e, "S3 stream read error");
                StorageError::DownloadFailed(e.to_string())
            })
        });

        Ok(Box::pin(stream))
    }

    async fn upload(&self, key: &str, content_type: &str, data: Vec<u8>) -> StorageResult<()> {
        let location = Path::from(key);
        let size = data.len();
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&location, PutPayload::from(data), options)
            .await
            .map_err(|e| {
                tracing::error!(
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    error = %e,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn upload_stream(
        &self,
        key: &str,
        _content_type: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let location = Path::from(key);
        let start = std::time::Instant::now();

        let multipart = self
            .store
            .put_multipart(&location)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        let mut writer = WriteMultipart::new(multipart);

        let mut total: u64 = 0;
        let mut buf = vec![0u8; STREAM_UPLOAD_CHUNK];
        loop {
            let read = reader
                .read(&mut buf)
                .await
                .map_err(|e| StorageError::UploadFailed(format!("Stream read failed: {}", e)))?;
            if read == 0 {
                break;
            }
            writer.write(&buf[..read]);
            total += read as u64;
        }

        writer
            .finish()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = total,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 stream upload successful"
        );

        Ok(total)
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<StoreEntry>> {
        let location = Path::from(prefix);

        let listing = self
            .store
            .list_with_delimiter(Some(&location))
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        let mut entries: Vec<StoreEntry> = listing
            .objects
            .into_iter()
            .map(|meta| StoreEntry {
                key: meta.location.to_string(),
                size: meta.size,
                last_modified: Some(meta.last_modified),
            })
            .collect();

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    async fn rename(&self, from: &str, to: &str) -> StorageResult<()> {
        let from_location = Path::from(from);
        let to_location = Path::from(to);

        self.store
            .rename(&from_location, &to_location)
            .await
            .map_err(|e| match e {
                ObjectStoreError::NotFound { .. } => StorageError::NotFound(from.to_string()),
                other => StorageError::BackendError(other.to_string()),
            })?;

        tracing::info!(bucket = %self.bucket, from = %from, to = %to, "S3 move successful");
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let location = Path::from(key);

        match self.store.delete(&location).await {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {
                tracing::info!(bucket = %self.bucket, key = %key, "S3 delete successful");
                Ok(())
            }
            Err(e) => {
                tracing::error!(bucket = %self.bucket, key = %key, error = %e, "S3 delete failed");
                Err(StorageError::DeleteFailed(e.to_string()))
            }
        }
    }
}
