//! Mooseek Core
//!
//! Domain types, collaborator traits, and error handling shared by the
//! Mooseek playback engine, catalog scanner, and server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `PlaybackSnapshot`, `RepeatMode`, `ShuffleStrategyId`
//! - **Collaborator Traits**: `CatalogProvider` (where tracks come from) and
//!   `Transport` (what actually makes sound)
//! - **Error Handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use mooseek_core::{CatalogProvider, InMemoryCatalog, Track};
//!
//! let catalog = InMemoryCatalog::new(vec![
//!     Track::new(1, "Intro", "intro.mp3"),
//!     Track::new(2, "Outro", "outro.mp3"),
//! ]);
//!
//! let tracks = catalog.list_tracks().unwrap();
//! assert_eq!(tracks.len(), 2);
//! assert_eq!(tracks[0].artist, "Unknown Artist");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CoreError, Result};
pub use traits::{CatalogProvider, InMemoryCatalog, NullTransport, Transport};
pub use types::{
    PlayState, PlaybackSnapshot, RepeatMode, ShuffleStrategyId, Track, TrackId, UNKNOWN_ALBUM,
    UNKNOWN_ARTIST, UNKNOWN_TITLE,
};
