/// Metadata reader implementation using lofty
use crate::error::{MetadataError, Result};
use lofty::{AudioFile, TaggedFileExt};
use std::path::Path;

/// Tag fields the catalog cares about. Missing tags stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagInfo {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_ms: Option<u64>,
}

/// Metadata reader using the lofty library
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyMetadataReader;

impl LoftyMetadataReader {
    /// Create a new metadata reader
    pub fn new() -> Self {
        Self
    }

    /// Extract metadata from lofty tag
    fn extract_from_tag(tag: &lofty::Tag, info: &mut TagInfo) {
        for item in tag.items() {
            let text = item
                .value()
                .text()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);

            match item.key() {
                lofty::ItemKey::TrackTitle => info.title = text,
                lofty::ItemKey::TrackArtist => info.artist = text,
                lofty::ItemKey::AlbumTitle => info.album = text,
                _ => {}
            }
        }
    }

    /// Read tags and duration from an audio file
    pub fn read(&self, path: &Path) -> Result<TagInfo> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.display().to_string()));
        }

        let tagged_file = lofty::read_from_path(path)
            .map_err(|e| MetadataError::ParseError(format!("{}: {}", path.display(), e)))?;

        let mut info = TagInfo {
            duration_ms: Some(tagged_file.properties().duration().as_millis() as u64),
            ..TagInfo::default()
        };

        if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
            Self::extract_from_tag(tag, &mut info);
        }

        Ok(info)
    }
}
