/// Catalog cache - the track list served by `/list` and loaded into the coordinator
use arc_swap::ArcSwap;
use mooseek_core::{CatalogProvider, Track};
use std::sync::Arc;

/// Holds the last catalog listing and refreshes it on demand.
///
/// Listing can walk a whole directory tree, so it runs on the blocking pool
/// and never while the coordinator lock is held.
pub struct CatalogService {
    provider: Arc<dyn CatalogProvider>,
    tracks: ArcSwap<Vec<Track>>,
}

impl CatalogService {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self {
            provider,
            tracks: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Last listing (empty until the first refresh)
    pub fn tracks(&self) -> Arc<Vec<Track>> {
        self.tracks.load_full()
    }

    /// Re-list the catalog and publish the result.
    ///
    /// An unavailable catalog is published as empty rather than failing the caller.
    pub async fn refresh(&self) -> Arc<Vec<Track>> {
        let provider = Arc::clone(&self.provider);
        let listed = tokio::task::spawn_blocking(move || provider.list_tracks()).await;

        let tracks = match listed {
            Ok(Ok(tracks)) => tracks,
            Ok(Err(e)) => {
                tracing::warn!("Catalog unavailable, serving empty list: {}", e);
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Catalog scan task failed, serving empty list: {}", e);
                Vec::new()
            }
        };

        tracing::info!("Catalog refreshed: {} tracks", tracks.len());
        let tracks = Arc::new(tracks);
        self.tracks.store(Arc::clone(&tracks));
        tracks
    }
}
