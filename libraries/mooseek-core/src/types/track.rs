/// Track domain type
use serde::{Deserialize, Serialize};

/// Stable track identity. Titles and artists are not unique; ids are.
pub type TrackId = i64;

/// Title used when a file carries no title tag and no usable file name
pub const UNKNOWN_TITLE: &str = "Unknown";
/// Artist used when a file carries no artist tag
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
/// Album used when a file carries no album tag
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// One playable audio item.
///
/// Tracks are immutable once listed by a catalog. Queue operations (filter,
/// sort, shuffle) only change the order tracks appear in, never the tracks
/// themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name
    pub album: String,

    /// Track duration in milliseconds
    pub duration_ms: u64,

    /// Locator the streaming endpoint resolves, `/`-separated and relative to
    /// the library root
    pub path: String,

    /// When the file was added to the library (epoch millis)
    pub date_added: i64,

    /// When the file was last modified (epoch millis)
    pub date_modified: i64,

    /// File size in bytes
    pub size_bytes: u64,
}

impl Track {
    /// Create a track with placeholder metadata
    pub fn new(id: TrackId, title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artist: UNKNOWN_ARTIST.to_string(),
            album: UNKNOWN_ALBUM.to_string(),
            duration_ms: 0,
            path: path.into(),
            date_added: 0,
            date_modified: 0,
            size_bytes: 0,
        }
    }

    /// Set the artist
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    /// Set the album
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    /// Set the duration in milliseconds
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the added/modified timestamps (epoch millis)
    #[must_use]
    pub fn with_dates(mut self, date_added: i64, date_modified: i64) -> Self {
        self.date_added = date_added;
        self.date_modified = date_modified;
        self
    }

    #[must_use]
    pub fn with_size_bytes(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    /// Case-insensitive substring match against title, artist, and album.
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.artist.to_lowercase().contains(needle)
            || self.album.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case() {
        let track = Track::new(7, "Song", "a/b.mp3")
            .with_duration_ms(1234)
            .with_dates(10, 20);
        let json = serde_json::to_value(&track).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["durationMs"], 1234);
        assert_eq!(json["dateAdded"], 10);
        assert_eq!(json["dateModified"], 20);
        assert_eq!(json["sizeBytes"], 0);
        assert_eq!(json["artist"], UNKNOWN_ARTIST);
    }

    #[test]
    fn matches_any_text_field() {
        let track = Track::new(1, "Blue Monday", "x.mp3")
            .with_artist("New Order")
            .with_album("Substance");

        assert!(track.matches("monday"));
        assert!(track.matches("order"));
        assert!(track.matches("subst"));
        assert!(!track.matches("joy division"));
    }
}
