//! Sync hub protocol tests, driven through the hub's client API

use mooseek_core::{InMemoryCatalog, PlaybackSnapshot, RepeatMode, ShuffleStrategyId, Track};
use mooseek_playback::{PlaybackConfig, PlaybackCoordinator, SharedCoordinator};
use mooseek_server::hub::messages::{Seq, ServerMessage};
use mooseek_server::hub::{ClientId, SyncHub};
use mooseek_server::{AppState, AssetBundle, CatalogService, FileResolver};
use std::sync::Arc;
use tokio::sync::mpsc::{error::TryRecvError, Receiver};

fn tracks() -> Vec<Track> {
    (1..=4)
        .map(|i| {
            Track::new(i, format!("Track {}", i), format!("{}.mp3", i)).with_duration_ms(120_000)
        })
        .collect()
}

fn hub() -> Arc<SyncHub> {
    let mut coordinator = PlaybackCoordinator::new(PlaybackConfig {
        seed: Some(11),
        ..PlaybackConfig::default()
    });
    coordinator.load_library(tracks());

    let state = AppState::new(
        Arc::new(CatalogService::new(Arc::new(InMemoryCatalog::new(tracks())))),
        Arc::new(FileResolver::new(std::env::temp_dir())),
        Arc::new(AssetBundle::embedded()),
        SharedCoordinator::new(coordinator),
        8,
    );
    state.hub
}

/// Connect and swallow the connect-time state
fn join(hub: &SyncHub) -> (ClientId, Receiver<ServerMessage>) {
    let (id, mut rx) = hub.connect();
    expect_state(&mut rx);
    (id, rx)
}

fn expect_state(rx: &mut Receiver<ServerMessage>) -> (PlaybackSnapshot, Option<Seq>) {
    match rx.try_recv() {
        Ok(ServerMessage::State { snapshot, echo }) => (snapshot, echo),
        other => panic!("expected state, got {:?}", other),
    }
}

fn expect_error(rx: &mut Receiver<ServerMessage>) -> (String, Option<Seq>) {
    match rx.try_recv() {
        Ok(ServerMessage::Error { message, echo }) => (message, echo),
        other => panic!("expected error, got {:?}", other),
    }
}

fn expect_silence(rx: &mut Receiver<ServerMessage>) {
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn connect_sends_current_state() {
    let hub = hub();
    let (_id, mut rx) = hub.connect();

    let (snapshot, echo) = expect_state(&mut rx);

    assert_eq!(snapshot.queue_length, 4);
    assert_eq!(snapshot.current_index, -1);
    assert_eq!(echo, None);
}

#[test]
fn play_command_reaches_every_client_and_late_joiners() {
    let hub = hub();
    let (a, mut rx_a) = join(&hub);
    let (_b, mut rx_b) = join(&hub);

    hub.handle_text(a, r#"{"type":"command","seq":7,"command":{"isPlaying":true}}"#);

    let (seen_a, echo_a) = expect_state(&mut rx_a);
    let (seen_b, echo_b) = expect_state(&mut rx_b);
    assert!(seen_a.is_playing);
    assert!(seen_b.is_playing);
    assert_eq!(echo_a, Some(7));
    assert_eq!(echo_b, None);
    assert_eq!(seen_a, seen_b);

    let (c, mut rx_c) = join(&hub);
    hub.handle_text(c, r#"{"type":"get_state","seq":1}"#);
    let (seen_c, echo_c) = expect_state(&mut rx_c);
    assert!(seen_c.is_playing);
    assert_eq!(echo_c, Some(1));

    // get_state is answered to the asker only
    expect_silence(&mut rx_a);
    expect_silence(&mut rx_b);
}

#[test]
fn unknown_song_is_an_error_for_the_sender_only() {
    let hub = hub();
    let (a, mut rx_a) = join(&hub);
    let (_b, mut rx_b) = join(&hub);
    let before = hub.coordinator().snapshot();

    hub.handle_text(a, r#"{"type":"command","seq":3,"command":{"songId":999}}"#);

    let (message, echo) = expect_error(&mut rx_a);
    assert!(message.contains("999"));
    assert_eq!(echo, Some(3));
    expect_silence(&mut rx_b);
    assert_eq!(*hub.coordinator().snapshot(), *before);
}

#[test]
fn rejected_command_leaves_no_partial_change() {
    let hub = hub();
    let (a, mut rx_a) = join(&hub);
    let (_b, mut rx_b) = join(&hub);
    let before = hub.coordinator().snapshot();

    hub.handle_text(
        a,
        r#"{"type":"command","seq":3,"command":{"filter":"Track 2","sort":"title","isPlaying":true,"songId":999}}"#,
    );

    let (message, echo) = expect_error(&mut rx_a);
    assert!(message.contains("999"));
    assert_eq!(echo, Some(3));
    expect_silence(&mut rx_a);
    expect_silence(&mut rx_b);

    let after = hub.coordinator().snapshot();
    assert_eq!(after.queue_length, 4);
    assert_eq!(after.revision, before.revision);
    assert_eq!(*after, *before);
}

#[test]
fn unparsable_message_gets_error_without_echo() {
    let hub = hub();
    let (a, mut rx_a) = join(&hub);

    hub.handle_text(a, "not json at all");
    let (_, echo) = expect_error(&mut rx_a);
    assert_eq!(echo, None);

    hub.handle_text(a, r#"{"type":"warp_drive"}"#);
    expect_error(&mut rx_a);

    assert_eq!(hub.client_count(), 1);
}

#[test]
fn mode_fields_are_applied() {
    let hub = hub();
    let (a, mut rx_a) = join(&hub);

    hub.handle_text(
        a,
        r#"{"type":"command","command":{"shuffle":true,"strategy":"cycle","repeat":"one"}}"#,
    );

    let (snapshot, _) = expect_state(&mut rx_a);
    assert!(snapshot.shuffle_enabled);
    assert_eq!(snapshot.shuffle_strategy, ShuffleStrategyId::Cycle);
    assert_eq!(snapshot.repeat_mode, RepeatMode::One);
}

#[test]
fn skip_commands_move_through_the_queue() {
    let hub = hub();
    let (a, mut rx_a) = join(&hub);

    hub.handle_text(a, r#"{"type":"command","command":{"songId":1}}"#);
    assert_eq!(expect_state(&mut rx_a).0.song_id, Some(1));

    hub.handle_text(a, r#"{"type":"command","command":{"next":true}}"#);
    assert_eq!(expect_state(&mut rx_a).0.song_id, Some(2));

    hub.handle_text(a, r#"{"type":"command","command":{"prev":true}}"#);
    assert_eq!(expect_state(&mut rx_a).0.song_id, Some(1));
}

#[test]
fn position_is_clamped_to_duration() {
    let hub = hub();
    let (a, mut rx_a) = join(&hub);

    hub.handle_text(
        a,
        r#"{"type":"command","command":{"songId":2,"position":999999999}}"#,
    );

    let (snapshot, _) = expect_state(&mut rx_a);
    assert_eq!(snapshot.song_id, Some(2));
    assert_eq!(snapshot.position, 120_000);
}

#[test]
fn song_list_replaces_the_queue() {
    let hub = hub();
    let (a, mut rx_a) = join(&hub);

    hub.handle_text(
        a,
        r#"{"type":"song_list","songs":[{"id":4},{"id":2},{"id":77}]}"#,
    );

    let (snapshot, _) = expect_state(&mut rx_a);
    assert_eq!(snapshot.queue_length, 2);
    assert_eq!(hub.coordinator().read(|c| c.queue().ids()), vec![4, 2]);
}

#[test]
fn filter_and_sort_reshape_the_queue() {
    let hub = hub();
    let (a, mut rx_a) = join(&hub);

    hub.handle_text(a, r#"{"type":"command","command":{"filter":"track 3"}}"#);
    assert_eq!(expect_state(&mut rx_a).0.queue_length, 1);

    hub.handle_text(a, r#"{"type":"command","command":{"filter":"","sort":"title"}}"#);
    assert_eq!(expect_state(&mut rx_a).0.queue_length, 4);
    assert_eq!(hub.coordinator().read(|c| c.queue().ids()), vec![1, 2, 3, 4]);
}

#[test]
fn ended_advances_like_a_natural_end() {
    let hub = hub();
    let (a, mut rx_a) = join(&hub);
    hub.handle_text(a, r#"{"type":"command","command":{"songId":3}}"#);
    expect_state(&mut rx_a);

    hub.handle_text(a, r#"{"type":"ended"}"#);
    let (snapshot, _) = expect_state(&mut rx_a);
    assert_eq!(snapshot.song_id, Some(4));
    assert!(snapshot.is_playing);

    // Last track without repeat: stays put, paused at 0
    hub.handle_text(a, r#"{"type":"ended"}"#);
    let (snapshot, _) = expect_state(&mut rx_a);
    assert_eq!(snapshot.song_id, Some(4));
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.position, 0);
}

#[test]
fn clients_see_revisions_in_order() {
    let hub = hub();
    let (a, mut rx_a) = join(&hub);
    let (b, mut rx_b) = join(&hub);

    for (i, from) in [a, b, a, b, a].into_iter().enumerate() {
        let playing = i % 2 == 0;
        hub.handle_text(
            from,
            &format!(r#"{{"type":"command","seq":{},"command":{{"isPlaying":{}}}}}"#, i, playing),
        );
    }

    for rx in [&mut rx_a, &mut rx_b] {
        let mut last = 0;
        for _ in 0..5 {
            let (snapshot, _) = expect_state(rx);
            assert!(snapshot.revision >= last);
            last = snapshot.revision;
        }
        expect_silence(rx);
    }
}

#[test]
fn disconnect_leaves_others_connected() {
    let hub = hub();
    let (a, mut rx_a) = join(&hub);
    let (b, rx_b) = join(&hub);

    hub.disconnect(b);
    drop(rx_b);
    hub.handle_text(a, r#"{"type":"command","command":{"isPlaying":true}}"#);

    assert!(expect_state(&mut rx_a).0.is_playing);
    assert!(hub.is_connected(a));
    assert!(!hub.is_connected(b));
}

#[tokio::test]
async fn concurrent_commands_from_many_clients() {
    let hub = hub();
    let mut receivers = Vec::new();
    let mut handles = Vec::new();

    for _ in 0..4 {
        let (id, rx) = join(&hub);
        receivers.push(rx);
        let hub = Arc::clone(&hub);
        handles.push(tokio::task::spawn_blocking(move || {
            hub.handle_text(id, r#"{"type":"command","command":{"next":true}}"#);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    for mut rx in receivers {
        let mut revisions = Vec::new();
        while let Ok(ServerMessage::State { snapshot, .. }) = rx.try_recv() {
            revisions.push(snapshot.revision);
        }
        assert!(revisions.windows(2).all(|w| w[0] < w[1]), "{:?}", revisions);
    }
}
