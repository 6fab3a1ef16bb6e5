//! Store backend selection from configuration.

use crate::{LocalStore, RemoteStore, S3Store, StorageError, StorageResult};
use mediastamp_core::{Config, StoreBackend};
use std::sync::Arc;
use std::time::Duration;

/// Create a remote store backend based on configuration.
pub async fn create_store(config: &Config) -> StorageResult<Arc<dyn RemoteStore>> {
    match config.store_backend {
        StoreBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region.clone().ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;

            let store = S3Store::new(
                bucket,
                region,
                config.s3_endpoint.clone(),
                Duration::from_secs(config.store_timeout_secs),
                config.store_max_connections,
            )?;
            Ok(Arc::new(store))
        }

        StoreBackend::Local => {
            let base_path = config.local_store_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORE_PATH not configured".to_string())
            })?;

            let store = LocalStore::new(base_path).await?;
            Ok(Arc::new(store))
        }
    }
}
