/// Playback state types shared between the coordinator and sync clients
use super::track::TrackId;
use serde::{Deserialize, Serialize};

/// Repeat mode for playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    Off,
    All,
    One,
}

impl RepeatMode {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::All => "all",
            Self::One => "one",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "off" => Some(Self::Off),
            "all" => Some(Self::All),
            "one" => Some(Self::One),
            _ => None,
        }
    }

    /// Next mode in the Off -> All -> One -> Off cycle
    #[must_use]
    pub fn cycled(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which shuffle algorithm decides the play order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShuffleStrategyId {
    /// Queue order
    Sequential,
    /// Uniform random pick, no memory
    Standard,
    /// Index-mapped pseudo-random permutation (no stored order)
    #[default]
    Miller,
    /// Every track once per cycle, with a play history for `previous`
    Cycle,
    /// Recently added tracks are favoured
    Weighted,
}

impl ShuffleStrategyId {
    /// All strategies, in presentation order
    pub const ALL: [Self; 5] = [
        Self::Sequential,
        Self::Standard,
        Self::Miller,
        Self::Cycle,
        Self::Weighted,
    ];

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Standard => "standard",
            Self::Miller => "miller",
            Self::Cycle => "cycle",
            Self::Weighted => "weighted",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }
}

impl std::fmt::Display for ShuffleStrategyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayState {
    /// Nothing selected
    #[default]
    Idle,
    /// Audio is playing
    Playing,
    /// A track is selected but not playing
    Paused,
}

/// Immutable copy of the authoritative playback state, as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    /// Current track, if any
    pub song_id: Option<TrackId>,

    /// Whether audio is playing
    pub is_playing: bool,

    /// Position within the current track in milliseconds
    pub position: u64,

    /// Duration of the current track in milliseconds
    pub duration_ms: u64,

    /// Index into the queue, or -1 when the current track is not in it
    pub current_index: i64,

    /// Version of the queue this index refers to
    pub queue_version: u64,

    /// Number of tracks in the queue
    pub queue_length: usize,

    /// Whether shuffle is on
    pub shuffle_enabled: bool,

    /// Selected shuffle strategy (applies only while shuffle is on)
    pub shuffle_strategy: ShuffleStrategyId,

    /// Repeat mode
    pub repeat_mode: RepeatMode,

    /// Coarse state
    pub state: PlayState,

    /// Incremented on every published change
    pub revision: u64,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            song_id: None,
            is_playing: false,
            position: 0,
            duration_ms: 0,
            current_index: -1,
            queue_version: 0,
            queue_length: 0,
            shuffle_enabled: false,
            shuffle_strategy: ShuffleStrategyId::default(),
            repeat_mode: RepeatMode::Off,
            state: PlayState::Idle,
            revision: 0,
        }
    }
}
