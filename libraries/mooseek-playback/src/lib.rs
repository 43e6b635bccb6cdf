//! Mooseek - Playback Management
//!
//! The shuffle engine and the playback coordinator behind the Mooseek
//! media server.
//!
//! This crate provides:
//! - A versioned, immutable play queue with search filter and sort
//! - Five shuffle strategies (Sequential, Standard, Miller, Cycle, Weighted)
//! - Repeat modes (Off, All, One)
//! - Restart-if-recent on `previous`
//! - A single event-driven transition function (`dispatch`)
//! - A lock-guarded shared handle with lock-free snapshot reads
//!
//! # Architecture
//!
//! `mooseek-playback` does no I/O:
//! - Tracks come in through `load_library` / `PlaybackEvent::LoadLibrary`
//! - Audio output goes out through the `Transport` trait from `mooseek-core`
//! - Clients read `PlaybackSnapshot` values, never live state
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use mooseek_playback::{PlaybackConfig, PlaybackCoordinator, Transition};
//! use mooseek_core::{RepeatMode, Track};
//!
//! let mut coordinator = PlaybackCoordinator::new(PlaybackConfig::default());
//! coordinator.load_library(vec![
//!     Track::new(1, "A", "a.mp3"),
//!     Track::new(2, "B", "b.mp3"),
//!     Track::new(3, "C", "c.mp3"),
//! ]);
//!
//! coordinator.play(3).unwrap();
//! coordinator.set_repeat(RepeatMode::All);
//! assert_eq!(coordinator.next(), Transition::Started(1));
//! ```
//!
//! # Example: Shared Handle
//!
//! ```rust
//! use mooseek_playback::{PlaybackCoordinator, PlaybackEvent, SharedCoordinator};
//! use mooseek_core::ShuffleStrategyId;
//!
//! let shared = SharedCoordinator::new(PlaybackCoordinator::default());
//! shared.dispatch(PlaybackEvent::SetStrategy(ShuffleStrategyId::Cycle));
//! let (_, snapshot) = shared.dispatch(PlaybackEvent::ToggleShuffle);
//!
//! assert!(snapshot.shuffle_enabled);
//! assert_eq!(shared.snapshot().revision, snapshot.revision);
//! ```

#![forbid(unsafe_code)]

pub mod coordinator;
pub mod error;
pub mod events;
pub mod queue;
pub mod shared;
pub mod shuffle;
pub mod types;

pub use coordinator::PlaybackCoordinator;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use queue::{Queue, SortKey};
pub use shared::SharedCoordinator;
pub use shuffle::{miller_index, weighted_order, ShuffleEngine, Step};
pub use types::{PlaybackConfig, Transition};
