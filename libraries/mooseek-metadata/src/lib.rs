//! Mooseek Metadata
//!
//! Turns a music directory into a catalog of `Track`s.
//!
//! This crate provides:
//! - Tag reading from audio files (MP3, FLAC, OGG, WAV, AAC, OPUS, M4A) via lofty
//! - Recursive discovery of supported files
//! - `DirectoryCatalog`, a `CatalogProvider` with ids that stay stable across scans
//!
//! # Example
//!
//! ```rust,no_run
//! use mooseek_core::CatalogProvider;
//! use mooseek_metadata::{DirectoryCatalog, ScanConfig};
//!
//! let catalog = DirectoryCatalog::new("/music", ScanConfig::default());
//! for track in catalog.list_tracks().unwrap() {
//!     println!("{} - {} ({})", track.artist, track.title, track.path);
//! }
//! ```

mod catalog;
mod error;
mod reader;
mod scanner;

pub use catalog::{track_id_for, DirectoryCatalog};
pub use error::{MetadataError, Result};
pub use reader::{LoftyMetadataReader, TagInfo};
pub use scanner::{discover_files, ScanConfig};
