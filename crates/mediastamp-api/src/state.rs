//! Application state.

use mediastamp_core::Config;
use mediastamp_processing::{LogoResolver, WatermarkPipeline};
use mediastamp_storage::RemoteStore;
use std::sync::Arc;

/// Shared state handed to every handler: the remote store, the logo
/// resolver, and the watermark pipeline, plus the loaded configuration.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn RemoteStore>,
    pub resolver: LogoResolver,
    pub watermark: Arc<WatermarkPipeline>,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
