//! Playback coordinator - the single source of truth
//!
//! Owns the library view, the queue, the current index, play state and
//! mode flags. Every mutation goes through a method here (or through
//! `dispatch`), which decides the new state first and then tells the
//! transport what to do.
//!
//! ```text
//!              play / resume
//!   Idle ───────────────────────► Playing ◄──────┐
//!    ▲                              │  ▲          │ resume
//!    │ library drops current        │  │ next     │
//!    │                        pause │  │ (track)  │
//!    │                              ▼  │          │
//!    └───────────────────────────  Paused ────────┘
//!                                   ▲
//!             next/ended at end ────┘ (index kept)
//! ```

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    queue::{filter_tracks, sort_tracks, Queue, SortKey},
    shuffle::{ShuffleEngine, Step},
    types::{PlaybackConfig, Transition},
};
use mooseek_core::{
    NullTransport, PlayState, PlaybackSnapshot, RepeatMode, ShuffleStrategyId, Track, TrackId,
    Transport,
};
use std::collections::HashMap;

/// Authoritative playback state machine
pub struct PlaybackCoordinator {
    config: PlaybackConfig,

    /// Everything the catalog listed, in catalog order
    library: Vec<Track>,
    filter: String,
    sort: SortKey,
    /// Explicit play order sent by a client; overrides filter/sort while set
    queue_override: Option<Vec<TrackId>>,

    /// Unshuffled order, restored when shuffle is turned off
    source: Vec<Track>,
    queue: Queue,
    current: Option<usize>,
    now_playing: Option<Track>,

    state: PlayState,
    position_ms: u64,
    repeat: RepeatMode,
    shuffle: ShuffleEngine,

    transport: Box<dyn Transport>,
    revision: u64,
}

impl PlaybackCoordinator {
    /// Coordinator with no audio output of its own
    pub fn new(config: PlaybackConfig) -> Self {
        Self::with_transport(config, Box::new(NullTransport))
    }

    pub fn with_transport(config: PlaybackConfig, transport: Box<dyn Transport>) -> Self {
        let shuffle = ShuffleEngine::new(config.shuffle_strategy, config.seed);
        Self {
            repeat: config.repeat,
            config,
            library: Vec::new(),
            filter: String::new(),
            sort: SortKey::Default,
            queue_override: None,
            source: Vec::new(),
            queue: Queue::new(),
            current: None,
            now_playing: None,
            state: PlayState::Idle,
            position_ms: 0,
            shuffle,
            transport,
            revision: 0,
        }
    }

    // ===== Dispatch =====

    /// Apply one event. This is the transition function every caller goes through.
    pub fn dispatch(&mut self, event: PlaybackEvent) -> Result<Transition> {
        tracing::debug!(event = event.name(), "Dispatching playback event");

        let transition = match event {
            PlaybackEvent::LoadLibrary { tracks } => self.load_library(tracks),
            PlaybackEvent::LoadQueue { ids } => self.load_queue(ids),
            PlaybackEvent::SetFilter { query } => self.set_filter(&query),
            PlaybackEvent::SetSort { key } => self.set_sort(key),
            PlaybackEvent::Play { track_id } => self.play(track_id)?,
            PlaybackEvent::PlayIndex { index } => self.play_index(index)?,
            PlaybackEvent::Resume => self.resume(),
            PlaybackEvent::Pause => self.pause(),
            PlaybackEvent::SetPlaying(playing) => self.set_playing(playing),
            PlaybackEvent::Seek { position_ms } => self.seek(position_ms),
            PlaybackEvent::Position { position_ms } => self.report_position(position_ms),
            PlaybackEvent::Next => self.next(),
            PlaybackEvent::Previous => self.previous(),
            PlaybackEvent::Ended => self.track_ended(),
            PlaybackEvent::ToggleShuffle => self.toggle_shuffle(),
            PlaybackEvent::SetShuffle(enabled) => self.set_shuffle(enabled),
            PlaybackEvent::SetStrategy(strategy) => self.set_shuffle_strategy(strategy),
            PlaybackEvent::SetRepeat(mode) => self.set_repeat(mode),
            PlaybackEvent::CycleRepeat => self.cycle_repeat(),
        };

        Ok(transition)
    }

    // ===== Library & Queue =====

    /// Replace the library. Stops playback if the current track disappeared.
    pub fn load_library(&mut self, tracks: Vec<Track>) -> Transition {
        self.library = tracks;

        let vanished = self
            .now_playing
            .as_ref()
            .is_some_and(|playing| !self.library.iter().any(|t| t.id == playing.id));
        if vanished {
            tracing::info!("Current track is no longer in the library, stopping");
            self.clear_playback();
        }

        self.rebuild_source();
        tracing::info!(
            "Library loaded: {} tracks, queue v{} has {}",
            self.library.len(),
            self.queue.version(),
            self.queue.len()
        );
        self.commit(Transition::Updated)
    }

    /// Use an explicit play order (unknown ids are skipped)
    pub fn load_queue(&mut self, ids: Vec<TrackId>) -> Transition {
        self.queue_override = Some(ids);
        self.rebuild_source();
        self.commit(Transition::Updated)
    }

    /// Filter the library view; drops any explicit queue
    pub fn set_filter(&mut self, query: &str) -> Transition {
        self.filter = query.trim().to_string();
        self.queue_override = None;
        self.rebuild_source();
        self.commit(Transition::Updated)
    }

    /// Sort the library view; drops any explicit queue
    pub fn set_sort(&mut self, key: SortKey) -> Transition {
        self.sort = key;
        self.queue_override = None;
        self.rebuild_source();
        self.commit(Transition::Updated)
    }

    fn rebuild_source(&mut self) {
        self.source = match &self.queue_override {
            Some(ids) => {
                let by_id: HashMap<TrackId, &Track> =
                    self.library.iter().map(|t| (t.id, t)).collect();
                ids.iter()
                    .filter_map(|id| by_id.get(id).map(|t| (*t).clone()))
                    .collect()
            }
            None => {
                let mut tracks = filter_tracks(self.library.clone(), &self.filter);
                sort_tracks(&mut tracks, self.sort);
                tracks
            }
        };
        self.rebuild_queue();
    }

    /// Publish a new queue from `source`, relocating the current track by id
    fn rebuild_queue(&mut self) {
        let current_id = self.now_playing.as_ref().map(|t| t.id);

        let ordered = if self.shuffle.active_strategy() == ShuffleStrategyId::Weighted {
            let pinned = current_id.and_then(|id| self.source.iter().position(|t| t.id == id));
            self.shuffle
                .weighted_order(&self.source, pinned)
                .into_iter()
                .map(|i| self.source[i].clone())
                .collect()
        } else {
            self.source.clone()
        };

        self.queue = self.queue.replaced(ordered);
        self.current = current_id.and_then(|id| self.queue.position_of(id));
        self.shuffle.reset(&self.queue, self.current);
    }

    // ===== Playback Control =====

    /// Play a track by id. Tracks outside the queue play with no queue index.
    pub fn play(&mut self, track_id: TrackId) -> Result<Transition> {
        if let Some(index) = self.queue.position_of(track_id) {
            return self.play_index(index);
        }

        let track = self
            .library
            .iter()
            .find(|t| t.id == track_id)
            .cloned()
            .ok_or(PlaybackError::TrackNotFound(track_id))?;

        let transition = self.jump(None, track);
        Ok(self.commit(transition))
    }

    /// Play the track at a queue index
    pub fn play_index(&mut self, index: usize) -> Result<Transition> {
        let track = self
            .queue
            .get(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;

        let transition = self.jump(Some(index), track);
        Ok(self.commit(transition))
    }

    /// Resume paused playback, or start the next track when idle
    pub fn resume(&mut self) -> Transition {
        let transition = match (self.state, self.now_playing.clone()) {
            (PlayState::Playing, _) => Transition::Unchanged,
            (PlayState::Paused, Some(track)) => {
                self.state = PlayState::Playing;
                self.transport.play(&track, self.position_ms);
                Transition::Resumed
            }
            _ => self.advance(),
        };
        self.commit(transition)
    }

    pub fn pause(&mut self) -> Transition {
        if self.state != PlayState::Playing {
            return Transition::Unchanged;
        }
        self.state = PlayState::Paused;
        self.transport.pause();
        self.commit(Transition::Paused)
    }

    pub fn set_playing(&mut self, playing: bool) -> Transition {
        if playing {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Skip forward under the active strategy
    pub fn next(&mut self) -> Transition {
        let transition = self.advance();
        self.commit(transition)
    }

    /// Skip back, or restart the current track once it has played past the threshold
    pub fn previous(&mut self) -> Transition {
        if self.now_playing.is_none() {
            return Transition::Unchanged;
        }
        if self.position_ms > self.config.restart_threshold_ms {
            self.position_ms = 0;
            self.transport.seek(0);
            return self.commit(Transition::Restarted);
        }

        let step = self
            .shuffle
            .previous(&self.queue, self.current, self.repeat);
        let transition = self.apply(step);
        self.commit(transition)
    }

    /// Natural end of the current track, as reported by the transport
    pub fn track_ended(&mut self) -> Transition {
        let Some(track) = self.now_playing.clone() else {
            return Transition::Unchanged;
        };

        if self.repeat == RepeatMode::One {
            self.position_ms = 0;
            self.state = PlayState::Playing;
            self.transport.play(&track, 0);
            return self.commit(Transition::Restarted);
        }

        let transition = match self.shuffle.next(&self.queue, self.current, self.repeat) {
            Step::End | Step::NoOp => {
                let rewound = self.position_ms != 0;
                let transition = self.halt();
                self.position_ms = 0;
                if transition == Transition::Unchanged && rewound {
                    Transition::Updated
                } else {
                    transition
                }
            }
            step => self.apply(step),
        };
        self.commit(transition)
    }

    fn advance(&mut self) -> Transition {
        let step = self.shuffle.next(&self.queue, self.current, self.repeat);
        self.apply(step)
    }

    fn apply(&mut self, step: Step) -> Transition {
        match step {
            Step::To(index) => match self.queue.get(index).cloned() {
                Some(track) => {
                    self.current = Some(index);
                    self.begin(track)
                }
                None => Transition::Unchanged,
            },
            Step::End => self.halt(),
            Step::NoOp => Transition::Unchanged,
        }
    }

    /// Explicit selection: keeps shuffle state in step with the jump.
    /// The queue order itself is left alone, including a weighted one.
    fn jump(&mut self, index: Option<usize>, track: Track) -> Transition {
        let from = self.current;
        self.current = index;
        if let Some(to) = index {
            self.shuffle.jumped(&self.queue, from, to);
        }

        self.begin(track)
    }

    fn begin(&mut self, track: Track) -> Transition {
        tracing::debug!("Starting track {} ({})", track.id, track.title);
        self.position_ms = 0;
        self.state = PlayState::Playing;
        self.transport.play(&track, 0);
        let id = track.id;
        self.now_playing = Some(track);
        Transition::Started(id)
    }

    /// No track in the requested direction: stay where we are, paused
    fn halt(&mut self) -> Transition {
        match self.state {
            PlayState::Playing => {
                self.state = PlayState::Paused;
                self.transport.pause();
                Transition::Paused
            }
            PlayState::Paused | PlayState::Idle => Transition::Unchanged,
        }
    }

    fn clear_playback(&mut self) {
        if self.state == PlayState::Playing {
            self.transport.pause();
        }
        self.now_playing = None;
        self.current = None;
        self.state = PlayState::Idle;
        self.position_ms = 0;
    }

    // ===== Seek =====

    /// Move the playhead, clamped to the track duration
    pub fn seek(&mut self, position_ms: u64) -> Transition {
        let Some(track) = &self.now_playing else {
            return Transition::Unchanged;
        };
        let position = clamp_position(position_ms, track.duration_ms);
        self.position_ms = position;
        self.transport.seek(position);
        self.commit(Transition::Updated)
    }

    /// Record transport progress without issuing a seek
    pub fn report_position(&mut self, position_ms: u64) -> Transition {
        let Some(track) = &self.now_playing else {
            return Transition::Unchanged;
        };
        let position = clamp_position(position_ms, track.duration_ms);
        if position == self.position_ms {
            return Transition::Unchanged;
        }
        self.position_ms = position;
        self.commit(Transition::Updated)
    }

    // ===== Shuffle & Repeat =====

    pub fn toggle_shuffle(&mut self) -> Transition {
        self.set_shuffle(!self.shuffle.is_enabled())
    }

    /// Turning shuffle on starts a fresh shuffle; turning it off restores queue order
    pub fn set_shuffle(&mut self, enabled: bool) -> Transition {
        if enabled == self.shuffle.is_enabled() {
            return Transition::Unchanged;
        }
        self.shuffle.set_enabled(enabled);
        self.rebuild_queue();
        tracing::info!(
            "Shuffle {} ({})",
            if enabled { "on" } else { "off" },
            self.shuffle.strategy()
        );
        self.commit(Transition::Updated)
    }

    pub fn set_shuffle_strategy(&mut self, strategy: ShuffleStrategyId) -> Transition {
        if strategy == self.shuffle.strategy() {
            return Transition::Unchanged;
        }
        self.shuffle.set_strategy(strategy);
        if self.shuffle.is_enabled() {
            self.rebuild_queue();
        } else {
            self.shuffle.reset(&self.queue, self.current);
        }
        self.commit(Transition::Updated)
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) -> Transition {
        if mode == self.repeat {
            return Transition::Unchanged;
        }
        self.repeat = mode;
        self.commit(Transition::Updated)
    }

    pub fn cycle_repeat(&mut self) -> Transition {
        self.set_repeat(self.repeat.cycled())
    }

    // ===== State Queries =====

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            song_id: self.now_playing.as_ref().map(|t| t.id),
            is_playing: self.state == PlayState::Playing,
            position: self.position_ms,
            duration_ms: self.now_playing.as_ref().map_or(0, |t| t.duration_ms),
            current_index: self.current.map_or(-1, |i| i as i64),
            queue_version: self.queue.version(),
            queue_length: self.queue.len(),
            shuffle_enabled: self.shuffle.is_enabled(),
            shuffle_strategy: self.shuffle.strategy(),
            repeat_mode: self.repeat,
            state: self.state,
            revision: self.revision,
        }
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.now_playing.as_ref()
    }

    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn is_shuffle_enabled(&self) -> bool {
        self.shuffle.is_enabled()
    }

    pub fn shuffle_strategy(&self) -> ShuffleStrategyId {
        self.shuffle.strategy()
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Whether `track_id` is in the library, and so playable
    pub fn contains(&self, track_id: TrackId) -> bool {
        self.library.iter().any(|t| t.id == track_id)
    }

    pub fn library(&self) -> &[Track] {
        &self.library
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn commit(&mut self, transition: Transition) -> Transition {
        if transition.is_change() {
            self.revision += 1;
        }
        transition
    }
}

impl Default for PlaybackCoordinator {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}

/// A duration of 0 means "unknown" and does not bound the position
fn clamp_position(position_ms: u64, duration_ms: u64) -> u64 {
    if duration_ms == 0 {
        position_ms
    } else {
        position_ms.min(duration_ms)
    }
}
