/// Shared application state
use crate::hub::SyncHub;
use crate::services::{AssetBundle, CatalogService, FileResolver};
use mooseek_playback::SharedCoordinator;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub files: Arc<FileResolver>,
    pub assets: Arc<AssetBundle>,
    pub coordinator: SharedCoordinator,
    pub hub: Arc<SyncHub>,
}

impl AppState {
    pub fn new(
        catalog: Arc<CatalogService>,
        files: Arc<FileResolver>,
        assets: Arc<AssetBundle>,
        coordinator: SharedCoordinator,
        client_buffer: usize,
    ) -> Self {
        let hub = Arc::new(SyncHub::new(coordinator.clone(), client_buffer));
        Self {
            catalog,
            files,
            assets,
            coordinator,
            hub,
        }
    }
}
