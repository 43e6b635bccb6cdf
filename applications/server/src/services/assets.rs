/// Companion UI files served by exact path
use crate::error::Result;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const EMBEDDED: &[(&str, &[u8])] = &[
    ("index.html", include_bytes!("../../assets/index.html")),
    ("app.js", include_bytes!("../../assets/app.js")),
    ("style.css", include_bytes!("../../assets/style.css")),
];

#[derive(Debug, Clone)]
enum AssetSource {
    Embedded(&'static [u8]),
    File(PathBuf),
}

/// A resolved asset ready to send
#[derive(Debug, Clone)]
pub struct Asset {
    pub body: Bytes,
    pub content_type: String,
}

/// Fixed set of files, keyed by their `/`-separated relative path.
///
/// Only files present when the bundle was built are served; nothing is
/// looked up on disk by request path.
#[derive(Debug, Clone)]
pub struct AssetBundle {
    entries: HashMap<String, AssetSource>,
}

impl AssetBundle {
    /// The small UI compiled into the binary
    pub fn embedded() -> Self {
        let entries = EMBEDDED
            .iter()
            .map(|(name, body)| ((*name).to_string(), AssetSource::Embedded(*body)))
            .collect();
        Self { entries }
    }

    /// Enumerate every regular file under `dir` once
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut entries = HashMap::new();

        for entry in walkdir::WalkDir::new(dir).follow_links(false) {
            let entry = entry.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(dir) else {
                continue;
            };
            let parts: Option<Vec<&str>> = relative
                .components()
                .map(|c| c.as_os_str().to_str())
                .collect();
            if let Some(parts) = parts {
                entries.insert(
                    parts.join("/"),
                    AssetSource::File(entry.path().to_path_buf()),
                );
            }
        }

        tracing::info!("Loaded {} assets from {}", entries.len(), dir.display());
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `request_path` names a file in the bundle
    pub fn contains(&self, request_path: &str) -> bool {
        self.entries.contains_key(asset_key(request_path))
    }

    /// Look up `request_path` (`/` means `index.html`)
    pub async fn get(&self, request_path: &str) -> Result<Option<Asset>> {
        let key = asset_key(request_path);
        let Some(source) = self.entries.get(key) else {
            return Ok(None);
        };

        let body = match source {
            AssetSource::Embedded(bytes) => Bytes::from_static(*bytes),
            AssetSource::File(path) => Bytes::from(tokio::fs::read(path).await?),
        };

        Ok(Some(Asset {
            body,
            content_type: mime_guess::from_path(key)
                .first_or_octet_stream()
                .to_string(),
        }))
    }
}

fn asset_key(request_path: &str) -> &str {
    match request_path.trim_start_matches('/') {
        "" => "index.html",
        key => key,
    }
}
