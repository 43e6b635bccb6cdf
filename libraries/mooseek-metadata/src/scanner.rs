/// Audio file discovery
use crate::error::{MetadataError, Result};
use std::path::{Path, PathBuf};

/// Scan configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Supported audio file extensions (lowercase, no dot)
    pub extensions: Vec<String>,

    /// Follow symlinks while walking (default: false)
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: ["mp3", "m4a", "ogg", "flac", "wav", "opus", "aac"]
                .iter()
                .map(|e| (*e).to_string())
                .collect(),
            follow_links: false,
        }
    }
}

impl ScanConfig {
    /// Check if file has a supported audio extension
    pub fn is_supported_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

/// Discover audio files under `path` recursively, sorted by path
pub fn discover_files(path: &Path, config: &ScanConfig) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(MetadataError::FileNotFound(path.display().to_string()));
    }

    let mut files = Vec::new();

    if path.is_file() {
        if config.is_supported_file(path) {
            files.push(path.to_path_buf());
        }
        return Ok(files);
    }

    for entry in walkdir::WalkDir::new(path)
        .follow_links(config.follow_links)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_file() && config.is_supported_file(path) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}
