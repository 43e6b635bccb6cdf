/// Core traits for Mooseek
use crate::error::Result;
use crate::types::Track;

/// Source of the track catalog.
///
/// Implementations may block (directory walks, tag reads); async callers
/// should invoke them from `spawn_blocking`.
pub trait CatalogProvider: Send + Sync {
    /// List every track in the catalog.
    ///
    /// # Errors
    /// Returns `CoreError::CatalogUnavailable` if the catalog cannot be read at all.
    /// Individual unreadable entries are skipped, not reported.
    fn list_tracks(&self) -> Result<Vec<Track>>;
}

/// Whatever produces sound for the current track.
///
/// The coordinator calls these after it has decided the new state; a
/// transport never changes playback state on its own. Natural end of a
/// track is reported back as a `PlaybackEvent::Ended`.
pub trait Transport: Send {
    /// Start `track` at `position_ms`
    fn play(&mut self, track: &Track, position_ms: u64);

    /// Pause output, keeping the position
    fn pause(&mut self);

    /// Move the playhead
    fn seek(&mut self, position_ms: u64);
}

/// Transport that does nothing.
///
/// Used when audio output lives in the remote clients.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn play(&mut self, _track: &Track, _position_ms: u64) {}

    fn pause(&mut self) {}

    fn seek(&mut self, _position_ms: u64) {}
}

/// Catalog backed by a fixed list of tracks
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    tracks: Vec<Track>,
}

impl InMemoryCatalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }
}

impl CatalogProvider for InMemoryCatalog {
    fn list_tracks(&self) -> Result<Vec<Track>> {
        Ok(self.tracks.clone())
    }
}
