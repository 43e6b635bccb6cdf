/// Maps stream locators to files inside the library root
use crate::error::{Result, ServerError};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileResolver {
    root: PathBuf,
}

impl FileResolver {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative locator to a regular file under the root.
    ///
    /// Absolute paths, `..` components and anything whose canonical form
    /// escapes the root are reported as not found.
    pub async fn resolve(&self, locator: &str) -> Result<PathBuf> {
        let relative = Path::new(locator);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if locator.is_empty() || !plain {
            return Err(ServerError::NotFound(format!("Invalid path: {}", locator)));
        }

        let canonical_root = tokio::fs::canonicalize(&self.root)
            .await
            .map_err(|e| ServerError::NotFound(format!("Library root unavailable: {}", e)))?;

        let canonical_path = tokio::fs::canonicalize(self.root.join(relative))
            .await
            .map_err(|_| ServerError::NotFound(format!("No such file: {}", locator)))?;

        if !canonical_path.starts_with(&canonical_root) {
            tracing::warn!("Rejected path outside library root: {}", locator);
            return Err(ServerError::NotFound(format!("No such file: {}", locator)));
        }

        let metadata = tokio::fs::metadata(&canonical_path).await?;
        if !metadata.is_file() {
            return Err(ServerError::NotFound(format!("Not a file: {}", locator)));
        }

        Ok(canonical_path)
    }
}
