//! Sync protocol messages
//!
//! JSON objects tagged by `type`. Field names are camelCase to match the
//! snapshot the clients already render.

use mooseek_core::{PlaybackSnapshot, RepeatMode, ShuffleStrategyId, TrackId};
use mooseek_playback::SortKey;
use serde::{Deserialize, Serialize};

/// Client-chosen sequence number echoed back to that client only
pub type Seq = u64;

/// Messages a client may send
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for the current state (answered to the sender only)
    GetState {
        #[serde(default)]
        seq: Option<Seq>,
    },

    /// Sparse playback update
    Command {
        #[serde(default)]
        seq: Option<Seq>,
        command: Command,
    },

    /// Replace the queue with an explicit list of songs
    SongList {
        #[serde(default)]
        seq: Option<Seq>,
        songs: Vec<SongRef>,
    },

    /// The client's audio output reached the end of the track
    Ended {
        #[serde(default)]
        seq: Option<Seq>,
    },
}

impl ClientMessage {
    pub fn seq(&self) -> Option<Seq> {
        match self {
            Self::GetState { seq }
            | Self::Command { seq, .. }
            | Self::SongList { seq, .. }
            | Self::Ended { seq } => *seq,
        }
    }
}

/// Every field is optional; absent fields leave that part of the state alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    #[serde(default)]
    pub is_playing: Option<bool>,

    /// Milliseconds. Fractional values from browser clocks are truncated.
    #[serde(default)]
    pub position: Option<f64>,

    #[serde(default)]
    pub song_id: Option<TrackId>,

    #[serde(default)]
    pub next: Option<bool>,

    #[serde(default)]
    pub prev: Option<bool>,

    #[serde(default)]
    pub shuffle: Option<bool>,

    #[serde(default)]
    pub repeat: Option<RepeatMode>,

    #[serde(default)]
    pub strategy: Option<ShuffleStrategyId>,

    /// Library search; an empty string clears it
    #[serde(default)]
    pub filter: Option<String>,

    #[serde(default)]
    pub sort: Option<SortKey>,
}

impl Command {
    pub fn wants_next(&self) -> bool {
        self.next == Some(true)
    }

    pub fn wants_prev(&self) -> bool {
        self.prev == Some(true)
    }

    /// Position as whole milliseconds, negative values treated as 0
    pub fn position_ms(&self) -> Option<u64> {
        self.position
            .filter(|p| p.is_finite())
            .map(|p| p.max(0.0) as u64)
    }
}

/// Entry of a `song_list`; extra fields sent by clients are ignored
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SongRef {
    pub id: TrackId,
}

/// Messages the hub sends
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    State {
        #[serde(flatten)]
        snapshot: PlaybackSnapshot,
        echo: Option<Seq>,
    },
    Error {
        message: String,
        echo: Option<Seq>,
    },
}

impl ServerMessage {
    pub fn state(snapshot: &PlaybackSnapshot, echo: Option<Seq>) -> Self {
        Self::State {
            snapshot: snapshot.clone(),
            echo,
        }
    }

    pub fn error(message: impl Into<String>, echo: Option<Seq>) -> Self {
        Self::Error {
            message: message.into(),
            echo,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_sparse_command() {
        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "command",
            "seq": 4,
            "command": { "isPlaying": true, "position": 1234.7, "repeat": "all" }
        }))
        .unwrap();

        let ClientMessage::Command { seq, command } = msg else {
            panic!("expected command");
        };
        assert_eq!(seq, Some(4));
        assert_eq!(command.is_playing, Some(true));
        assert_eq!(command.position_ms(), Some(1234));
        assert_eq!(command.repeat, Some(RepeatMode::All));
        assert_eq!(command.song_id, None);
        assert!(!command.wants_next());
    }

    #[test]
    fn parses_library_view_fields() {
        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "command",
            "command": { "filter": "beat", "sort": "dateAdded" }
        }))
        .unwrap();

        let ClientMessage::Command { command, .. } = msg else {
            panic!("expected command");
        };
        assert_eq!(command.filter.as_deref(), Some("beat"));
        assert_eq!(command.sort, Some(SortKey::DateAdded));
    }

    #[test]
    fn parses_song_list_ignoring_extra_fields() {
        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "song_list",
            "songs": [{ "id": 3, "title": "x" }, { "id": 9 }]
        }))
        .unwrap();

        assert_eq!(
            msg,
            ClientMessage::SongList {
                seq: None,
                songs: vec![SongRef { id: 3 }, SongRef { id: 9 }],
            }
        );
    }

    #[test]
    fn parses_bare_messages() {
        let ended: ClientMessage = serde_json::from_str(r#"{"type":"ended"}"#).unwrap();
        assert_eq!(ended, ClientMessage::Ended { seq: None });

        let get: ClientMessage = serde_json::from_str(r#"{"type":"get_state","seq":1}"#).unwrap();
        assert_eq!(get.seq(), Some(1));
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"dance"}"#).is_err());
    }

    #[test]
    fn state_message_flattens_snapshot() {
        let snapshot = PlaybackSnapshot {
            song_id: Some(5),
            is_playing: true,
            ..PlaybackSnapshot::default()
        };
        let value: serde_json::Value =
            serde_json::from_str(&ServerMessage::state(&snapshot, Some(2)).to_json().unwrap())
                .unwrap();

        assert_eq!(value["type"], "state");
        assert_eq!(value["songId"], 5);
        assert_eq!(value["isPlaying"], true);
        assert_eq!(value["currentIndex"], -1);
        assert_eq!(value["echo"], 2);
    }

    #[test]
    fn error_message_has_null_echo_by_default() {
        let value: serde_json::Value =
            serde_json::from_str(&ServerMessage::error("bad", None).to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(value["message"], "bad");
        assert!(value["echo"].is_null());
    }
}
