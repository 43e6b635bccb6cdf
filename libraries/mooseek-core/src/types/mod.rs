mod playback_state;
mod track;

pub use playback_state::{PlayState, PlaybackSnapshot, RepeatMode, ShuffleStrategyId};
pub use track::{Track, TrackId, UNKNOWN_ALBUM, UNKNOWN_ARTIST, UNKNOWN_TITLE};
