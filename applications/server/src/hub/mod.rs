//! Playback sync hub
//!
//! Every connected client gets an id and a bounded outbound queue. Commands
//! are applied to the shared coordinator and the resulting snapshot is fanned
//! out to every client while the client-set lock is held, so all clients see
//! snapshots in revision order. Sends never wait: a client whose queue is
//! full or closed is dropped from the set.

pub mod messages;
pub mod socket;

use messages::{ClientMessage, Command, Seq, ServerMessage};
use mooseek_core::{PlaybackSnapshot, TrackId};
use mooseek_playback::{PlaybackCoordinator, PlaybackError, PlaybackEvent, SharedCoordinator};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

pub type ClientId = u64;

type Clients = HashMap<ClientId, mpsc::Sender<ServerMessage>>;

pub struct SyncHub {
    coordinator: SharedCoordinator,
    clients: Mutex<Clients>,
    next_id: AtomicU64,
    buffer: usize,
}

impl SyncHub {
    pub fn new(coordinator: SharedCoordinator, client_buffer: usize) -> Self {
        Self {
            coordinator,
            clients: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            buffer: client_buffer.max(1),
        }
    }

    pub fn coordinator(&self) -> &SharedCoordinator {
        &self.coordinator
    }

    fn lock_clients(&self) -> MutexGuard<'_, Clients> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a client. The current state is already queued on the returned receiver.
    pub fn connect(&self) -> (ClientId, mpsc::Receiver<ServerMessage>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.buffer);

        let mut clients = self.lock_clients();
        let snapshot = self.coordinator.snapshot();
        // A fresh channel always has room for the first message.
        let _ = tx.try_send(ServerMessage::state(&snapshot, None));
        clients.insert(id, tx);

        tracing::debug!(client = id, clients = clients.len(), "Sync client connected");
        (id, rx)
    }

    pub fn disconnect(&self, id: ClientId) {
        let mut clients = self.lock_clients();
        if clients.remove(&id).is_some() {
            tracing::debug!(client = id, clients = clients.len(), "Sync client disconnected");
        }
    }

    pub fn client_count(&self) -> usize {
        self.lock_clients().len()
    }

    pub fn is_connected(&self, id: ClientId) -> bool {
        self.lock_clients().contains_key(&id)
    }

    /// Handle one raw text frame from `from`
    pub fn handle_text(&self, from: ClientId, text: &str) {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(message) => self.handle_message(from, message),
            Err(e) => {
                tracing::debug!(client = from, "Unparsable sync message: {}", e);
                let mut clients = self.lock_clients();
                send_to(
                    &mut clients,
                    from,
                    ServerMessage::error(format!("invalid message: {}", e), None),
                );
            }
        }
    }

    pub fn handle_message(&self, from: ClientId, message: ClientMessage) {
        let seq = message.seq();
        let mut clients = self.lock_clients();
        let before = self.coordinator.snapshot().revision;

        let outcome = match message {
            ClientMessage::GetState { .. } => {
                let snapshot = self.coordinator.snapshot();
                send_to(&mut clients, from, ServerMessage::state(&snapshot, seq));
                return;
            }
            ClientMessage::Command { command, .. } => {
                tracing::debug!(client = from, ?seq, ?command, "Sync command");
                self.coordinator
                    .update(|coordinator| apply_command(coordinator, &command))
            }
            ClientMessage::SongList { songs, .. } => {
                let ids = songs.into_iter().map(|s| s.id).collect();
                let (result, snapshot) = self.coordinator.dispatch(PlaybackEvent::LoadQueue { ids });
                (result.map(|_| ()), snapshot)
            }
            ClientMessage::Ended { .. } => {
                let (result, snapshot) = self.coordinator.dispatch(PlaybackEvent::Ended);
                (result.map(|_| ()), snapshot)
            }
        };

        match outcome {
            (Ok(()), snapshot) => broadcast(&mut clients, &snapshot, Some((from, seq))),
            (Err(e), snapshot) => {
                tracing::debug!(client = from, "Rejected sync command: {}", e);
                send_to(&mut clients, from, ServerMessage::error(e.to_string(), seq));
                // Events applied before the failure are already published.
                if snapshot.revision != before {
                    broadcast(&mut clients, &snapshot, None);
                }
            }
        }
    }

    /// Mutate the coordinator on behalf of the server itself and broadcast the result
    pub fn apply<R>(&self, f: impl FnOnce(&mut PlaybackCoordinator) -> R) -> R {
        let mut clients = self.lock_clients();
        let (result, snapshot) = self.coordinator.update(f);
        broadcast(&mut clients, &snapshot, None);
        result
    }
}

/// Translate a sparse command into coordinator events, in protocol order.
///
/// Library view changes (`filter`, `sort`) reshape the queue first. Then
/// `songId`, only when no skip is requested and it differs from `current`.
/// Skips come last.
pub fn command_events(command: &Command, current: Option<TrackId>) -> Vec<PlaybackEvent> {
    let mut events = Vec::new();
    let skipping = command.wants_next() || command.wants_prev();

    if let Some(query) = &command.filter {
        events.push(PlaybackEvent::SetFilter {
            query: query.clone(),
        });
    }
    if let Some(key) = command.sort {
        events.push(PlaybackEvent::SetSort { key });
    }

    if let Some(track_id) = command.song_id {
        if !skipping && current != Some(track_id) {
            events.push(PlaybackEvent::Play { track_id });
        }
    }
    if let Some(position_ms) = command.position_ms() {
        events.push(PlaybackEvent::Seek { position_ms });
    }
    if let Some(playing) = command.is_playing {
        events.push(PlaybackEvent::SetPlaying(playing));
    }
    if let Some(shuffle) = command.shuffle {
        events.push(PlaybackEvent::SetShuffle(shuffle));
    }
    if let Some(strategy) = command.strategy {
        events.push(PlaybackEvent::SetStrategy(strategy));
    }
    if let Some(repeat) = command.repeat {
        events.push(PlaybackEvent::SetRepeat(repeat));
    }
    if command.wants_next() {
        events.push(PlaybackEvent::Next);
    } else if command.wants_prev() {
        events.push(PlaybackEvent::Previous);
    }

    events
}

fn apply_command(
    coordinator: &mut PlaybackCoordinator,
    command: &Command,
) -> Result<(), PlaybackError> {
    let current = coordinator.current_track().map(|t| t.id);
    let events = command_events(command, current);

    // Reject the whole command before anything is applied
    for event in &events {
        if let PlaybackEvent::Play { track_id } = event {
            if !coordinator.contains(*track_id) {
                return Err(PlaybackError::TrackNotFound(*track_id));
            }
        }
    }

    for event in events {
        coordinator.dispatch(event)?;
    }
    Ok(())
}

fn send_to(clients: &mut Clients, id: ClientId, message: ServerMessage) {
    let Some(tx) = clients.get(&id) else {
        return;
    };
    if tx.try_send(message).is_err() {
        tracing::debug!(client = id, "Dropping sync client with full or closed queue");
        clients.remove(&id);
    }
}

/// Send `snapshot` to every client; only `origin` gets its `seq` back
fn broadcast(
    clients: &mut Clients,
    snapshot: &PlaybackSnapshot,
    origin: Option<(ClientId, Option<Seq>)>,
) {
    clients.retain(|&id, tx| {
        let echo = match origin {
            Some((from, seq)) if from == id => seq,
            _ => None,
        };
        match tx.try_send(ServerMessage::state(snapshot, echo)) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(client = id, "Dropping sync client: {}", e);
                false
            }
        }
    });
}
