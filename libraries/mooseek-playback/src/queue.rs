//! Versioned, immutable play queue
//!
//! The queue is never edited in place. Every load, filter, sort, or shuffle
//! reorder produces a new `Queue` with a bumped version, so shuffle state
//! built against an older queue can detect that it is stale.
//!
//! ```text
//! library ──filter──► sort ──► source order ──(weighted reorder)──► Queue v(n+1)
//! ```

use mooseek_core::{Track, TrackId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Ordered, shared list of tracks plus a version stamp
#[derive(Debug, Clone)]
pub struct Queue {
    tracks: Arc<[Track]>,
    version: u64,
}

impl Queue {
    /// Empty queue at version 0
    pub fn new() -> Self {
        Self {
            tracks: Arc::from(Vec::new()),
            version: 0,
        }
    }

    /// Build the successor of this queue holding `tracks`
    #[must_use]
    pub fn replaced(&self, tracks: Vec<Track>) -> Self {
        Self {
            tracks: Arc::from(tracks),
            version: self.version + 1,
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Index of the track with `id`, if queued
    pub fn position_of(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Track ids in queue order
    pub fn ids(&self) -> Vec<TrackId> {
        self.tracks.iter().map(|t| t.id).collect()
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordering applied to the library before it becomes the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Catalog order
    #[default]
    Default,
    /// Title, case-insensitive, A to Z
    Title,
    /// Newest additions first
    DateAdded,
    /// Most recently modified first
    DateModified,
}

impl SortKey {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Title => "title",
            Self::DateAdded => "dateAdded",
            Self::DateModified => "dateModified",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "default" => Some(Self::Default),
            "title" => Some(Self::Title),
            "dateAdded" => Some(Self::DateAdded),
            "dateModified" => Some(Self::DateModified),
            _ => None,
        }
    }
}

/// Keep tracks whose title, artist, or album contains `query`, ignoring case.
///
/// A blank query keeps everything.
pub fn filter_tracks(tracks: Vec<Track>, query: &str) -> Vec<Track> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return tracks;
    }
    tracks.into_iter().filter(|t| t.matches(&needle)).collect()
}

/// Stable sort by `key`; `SortKey::Default` leaves the order untouched
pub fn sort_tracks(tracks: &mut [Track], key: SortKey) {
    match key {
        SortKey::Default => {}
        SortKey::Title => tracks.sort_by_cached_key(|t| t.title.to_lowercase()),
        SortKey::DateAdded => tracks.sort_by(|a, b| b.date_added.cmp(&a.date_added)),
        SortKey::DateModified => tracks.sort_by(|a, b| b.date_modified.cmp(&a.date_modified)),
    }
}
