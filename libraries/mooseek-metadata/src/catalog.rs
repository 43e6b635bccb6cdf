//! Directory-backed catalog
//!
//! Walks the library root, reads tags where it can, and falls back to the
//! file name where it can't. Track ids are derived from the relative path so
//! they survive rescans and restarts.

use crate::reader::{LoftyMetadataReader, TagInfo};
use crate::scanner::{discover_files, ScanConfig};
use chrono::{DateTime, Utc};
use mooseek_core::{
    CatalogProvider, CoreError, Track, TrackId, UNKNOWN_ALBUM, UNKNOWN_ARTIST, UNKNOWN_TITLE,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use xxhash_rust::xxh64::xxh64;

/// Stable id for a library-relative path. Always non-negative.
pub fn track_id_for(relative_path: &str) -> TrackId {
    (xxh64(relative_path.as_bytes(), 0) >> 1) as TrackId
}

/// Catalog that lists every supported audio file under a root directory
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
    config: ScanConfig,
    reader: LoftyMetadataReader,
}

impl DirectoryCatalog {
    pub fn new(root: impl Into<PathBuf>, config: ScanConfig) -> Self {
        Self {
            root: root.into(),
            config,
            reader: LoftyMetadataReader::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn track_for(&self, path: &Path) -> Option<Track> {
        let relative = relative_locator(&self.root, path)?;
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(e) => {
                tracing::debug!("Skipping {}: {}", path.display(), e);
                return None;
            }
        };

        let tags = self.reader.read(path).unwrap_or_else(|e| {
            tracing::debug!("No readable tags in {}: {}", path.display(), e);
            TagInfo::default()
        });

        let modified = meta.modified().ok().map_or(0, epoch_millis);
        let added = meta.created().ok().map_or(modified, epoch_millis);

        let title = tags.title.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .filter(|s| !s.is_empty())
                .unwrap_or(UNKNOWN_TITLE)
                .to_string()
        });

        Some(
            Track::new(track_id_for(&relative), title, relative)
                .with_artist(tags.artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()))
                .with_album(tags.album.unwrap_or_else(|| UNKNOWN_ALBUM.to_string()))
                .with_duration_ms(tags.duration_ms.unwrap_or(0))
                .with_dates(added, modified)
                .with_size_bytes(meta.len()),
        )
    }
}

impl CatalogProvider for DirectoryCatalog {
    fn list_tracks(&self) -> mooseek_core::Result<Vec<Track>> {
        if !self.root.is_dir() {
            return Err(CoreError::catalog_unavailable(format!(
                "library root {} is not a directory",
                self.root.display()
            )));
        }

        let files = discover_files(&self.root, &self.config)?;
        let mut tracks: Vec<Track> = files.iter().filter_map(|p| self.track_for(p)).collect();
        tracks.sort_by(|a, b| a.path.cmp(&b.path));

        tracing::info!(
            "Catalog scan of {} found {} tracks",
            self.root.display(),
            tracks.len()
        );
        Ok(tracks)
    }
}

/// `/`-joined path of `path` relative to `root`, or `None` if any component
/// is not valid UTF-8
fn relative_locator(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}

fn epoch_millis(time: SystemTime) -> i64 {
    DateTime::<Utc>::from(time).timestamp_millis()
}
