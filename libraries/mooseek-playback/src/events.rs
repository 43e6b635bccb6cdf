//! Playback Events
//!
//! Every input to the coordinator, whether a client command, a transport
//! notification, or a library reload, is one of these values. They are fed
//! one at a time to `PlaybackCoordinator::dispatch`, which is the only
//! place state transitions happen. Ordering is whatever order the caller
//! delivers them in; there are no callbacks.

use crate::queue::SortKey;
use mooseek_core::{RepeatMode, ShuffleStrategyId, Track, TrackId};
use serde::{Deserialize, Serialize};

/// Inputs to the playback state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Replace the library (after a catalog scan)
    LoadLibrary {
        /// Every track the catalog listed
        tracks: Vec<Track>,
    },

    /// Replace the queue with an explicit list of track ids
    LoadQueue {
        /// Ids in play order; unknown ids are skipped
        ids: Vec<TrackId>,
    },

    /// Search filter over title, artist, and album
    SetFilter {
        /// Case-insensitive substring; blank clears the filter
        query: String,
    },

    /// Reorder the library view
    SetSort {
        /// New ordering
        key: SortKey,
    },

    /// Start a specific track from the beginning
    Play {
        /// Track to play
        track_id: TrackId,
    },

    /// Start the track at a queue index
    PlayIndex {
        /// Queue index
        index: usize,
    },

    /// Resume (or start, when idle)
    Resume,

    /// Pause
    Pause,

    /// Resume or pause depending on the flag
    SetPlaying(bool),

    /// Move the playhead
    Seek {
        /// Target position, clamped to the track duration
        position_ms: u64,
    },

    /// Progress reported by the transport (no seek issued)
    Position {
        /// Current position
        position_ms: u64,
    },

    /// Skip forward
    Next,

    /// Skip back, or restart the current track if it has played for a while
    Previous,

    /// The transport reached the end of the current track
    Ended,

    /// Flip shuffle on/off
    ToggleShuffle,

    /// Set shuffle on/off
    SetShuffle(bool),

    /// Choose the shuffle strategy
    SetStrategy(ShuffleStrategyId),

    /// Set repeat mode
    SetRepeat(RepeatMode),

    /// Off -> All -> One -> Off
    CycleRepeat,
}

impl PlaybackEvent {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadLibrary { .. } => "load_library",
            Self::LoadQueue { .. } => "load_queue",
            Self::SetFilter { .. } => "set_filter",
            Self::SetSort { .. } => "set_sort",
            Self::Play { .. } => "play",
            Self::PlayIndex { .. } => "play_index",
            Self::Resume => "resume",
            Self::Pause => "pause",
            Self::SetPlaying(_) => "set_playing",
            Self::Seek { .. } => "seek",
            Self::Position { .. } => "position",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::Ended => "ended",
            Self::ToggleShuffle => "toggle_shuffle",
            Self::SetShuffle(_) => "set_shuffle",
            Self::SetStrategy(_) => "set_strategy",
            Self::SetRepeat(_) => "set_repeat",
            Self::CycleRepeat => "cycle_repeat",
        }
    }
}
