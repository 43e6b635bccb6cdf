//! Core types for playback management

use mooseek_core::{RepeatMode, ShuffleStrategyId, TrackId};
use serde::{Deserialize, Serialize};

/// Configuration for the playback coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// `previous()` past this position restarts the current track (default: 3000)
    pub restart_threshold_ms: u64,

    /// Strategy used when shuffle is turned on (default: Miller)
    pub shuffle_strategy: ShuffleStrategyId,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Fixed RNG seed for reproducible shuffles; entropy when unset
    pub seed: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            restart_threshold_ms: 3000,
            shuffle_strategy: ShuffleStrategyId::Miller,
            repeat: RepeatMode::Off,
            seed: None,
        }
    }
}

/// What a coordinator operation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A track was selected and started from the beginning
    Started(TrackId),

    /// The current track was rewound to 0
    Restarted,

    /// Paused playback was resumed
    Resumed,

    /// Playback paused, either on request or because the queue ran out
    Paused,

    /// Playback was cleared back to idle
    Stopped,

    /// Modes, position, or queue changed without a track change
    Updated,

    /// Nothing changed
    Unchanged,
}

impl Transition {
    /// Whether clients need a fresh snapshot
    pub fn is_change(self) -> bool {
        self != Self::Unchanged
    }
}
