//! Logo resolution against the remote store.
//!
//! A scope (an organization prefix or the singleton admin scope) owns at most
//! one logo, stored as `{scope}/logo{ext}`. Resolution probes a fixed ordered
//! extension list and returns the first hit; the ordering is part of the
//! contract, so `.png` always wins over `.jpg` when both exist.

use mediastamp_storage::{keys, RemoteStore, StorageResult};
use std::sync::Arc;

/// Fixed probe order. Also the full set of extensions the replacement policy
/// clears before writing a new logo.
pub const LOGO_EXTENSIONS: &[&str] =
    &[".png", ".jpg", ".jpeg", ".svg", ".jfif", ".webp", ".gif"];

/// A resolved logo: raw bytes plus the extension it was found under.
#[derive(Debug, Clone)]
pub struct LogoAsset {
    pub bytes: Vec<u8>,
    pub extension: String,
}

/// Resolves, replaces, and removes per-scope logos.
///
/// Resolution is per-request; nothing is cached across calls since logos can
/// change between them.
#[derive(Clone)]
pub struct LogoResolver {
    store: Arc<dyn RemoteStore>,
}

impl LogoResolver {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        LogoResolver { store }
    }

    /// Find the scope's logo, testing each known extension in order.
    ///
    /// A missing logo is `Ok(None)` - the expected negative case. Transport
    /// errors propagate.
    pub async fn resolve(&self, scope: &str) -> StorageResult<Option<LogoAsset>> {
        for ext in LOGO_EXTENSIONS {
            let key = keys::logo_key(scope, ext);
            if !self.store.exists(&key).await? {
                continue;
            }
            match self.store.download(&key).await {
                Ok(bytes) => {
                    return Ok(Some(LogoAsset {
                        bytes,
                        extension: (*ext).to_string(),
                    }))
                }
                // Deleted between the probe and the read; treat as a miss.
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    /// Replace the scope's logo: delete every extension variant first, then
    /// write the new one, so at most one logo file ever exists per scope.
    pub async fn replace(
        &self,
        scope: &str,
        extension: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> StorageResult<String> {
        self.remove(scope).await?;

        let key = keys::logo_key(scope, extension);
        self.store.upload(&key, content_type, bytes).await?;

        tracing::info!(scope = %scope, key = %key, "Logo replaced");
        Ok(key)
    }

    /// Delete every extension variant of the scope's logo.
    pub async fn remove(&self, scope: &str) -> StorageResult<()> {
        for ext in LOGO_EXTENSIONS {
            self.store.delete(&keys::logo_key(scope, ext)).await?;
        }
        Ok(())
    }
}
