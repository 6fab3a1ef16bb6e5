//! Store backend setup.

use anyhow::{Context, Result};
use mediastamp_core::Config;
use mediastamp_storage::{create_store, RemoteStore};
use std::sync::Arc;

pub async fn setup_store(config: &Config) -> Result<Arc<dyn RemoteStore>> {
    let store = create_store(config)
        .await
        .context("Failed to initialize remote store backend")?;

    tracing::info!(
        backend = ?config.store_backend,
        timeout_secs = config.store_timeout_secs,
        max_connections = config.store_max_connections,
        "Remote store initialized"
    );

    Ok(store)
}
