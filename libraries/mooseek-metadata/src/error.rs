/// Metadata-specific errors
use thiserror::Error;

/// Result type alias using `MetadataError`
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Metadata error types
#[derive(Error, Debug)]
pub enum MetadataError {
    /// File or directory not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Tag parsing error
    #[error("Tag parsing error: {0}")]
    ParseError(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<MetadataError> for mooseek_core::CoreError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::Io(e) => mooseek_core::CoreError::Io(e),
            other => mooseek_core::CoreError::catalog_unavailable(other.to_string()),
        }
    }
}
