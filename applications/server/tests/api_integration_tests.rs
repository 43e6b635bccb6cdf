//! HTTP surface tests: catalog, state, queue, rescan, and companion assets

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{body_bytes, body_json, TestApp};
use mooseek_metadata::track_id_for;
use mooseek_server::hub::messages::ServerMessage;

async fn library_app() -> TestApp {
    TestApp::with_files(&[
        ("b/second.mp3", vec![0; 20]),
        ("a/first.flac", vec![0; 10]),
        ("cover.jpg", vec![0; 5]),
    ])
    .await
}

#[tokio::test]
async fn health_reports_ok() {
    let app = library_app().await;

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["tracks"], 2);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn list_returns_catalog_tracks() {
    let app = library_app().await;

    let response = app.get("/list").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let tracks = json.as_array().unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0]["path"], "a/first.flac");
    assert_eq!(tracks[0]["id"], track_id_for("a/first.flac"));
    assert_eq!(tracks[0]["title"], "first");
    assert_eq!(tracks[0]["artist"], "Unknown Artist");
    assert_eq!(tracks[0]["sizeBytes"], 10);
    assert_eq!(tracks[1]["path"], "b/second.mp3");
}

#[tokio::test]
async fn list_is_empty_for_missing_library() {
    let app = library_app().await;
    let root = app.dir.path().to_path_buf();
    std::fs::remove_dir_all(&root).unwrap();

    let rescan = app
        .request(
            Request::builder()
                .method(Method::POST)
                .uri("/rescan")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(rescan.status(), StatusCode::OK);

    let json = body_json(app.get("/list").await).await;
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn state_starts_idle() {
    let app = library_app().await;

    let json = body_json(app.get("/state").await).await;

    assert_eq!(json["songId"], serde_json::Value::Null);
    assert_eq!(json["currentIndex"], -1);
    assert_eq!(json["isPlaying"], false);
    assert_eq!(json["state"], "idle");
    assert_eq!(json["queueLength"], 2);
    assert_eq!(json["shuffleStrategy"], "miller");
    assert_eq!(json["repeatMode"], "off");
}

#[tokio::test]
async fn queue_follows_catalog_order() {
    let app = library_app().await;

    let json = body_json(app.get("/queue").await).await;

    assert_eq!(
        json["ids"],
        serde_json::json!([track_id_for("a/first.flac"), track_id_for("b/second.mp3")])
    );
    assert_eq!(json["currentIndex"], -1);
    assert!(json["version"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn rescan_picks_up_new_files_and_broadcasts() {
    let app = library_app().await;
    let (_client, mut rx) = app.state.hub.connect();
    rx.try_recv().unwrap();

    common::write_file(app.dir.path(), "c/third.ogg", &[0; 30]);
    let response = app
        .request(
            Request::builder()
                .method(Method::POST)
                .uri("/rescan")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["tracks"], 3);
    assert_eq!(json["queueLength"], 3);

    let listed = body_json(app.get("/list").await).await;
    assert_eq!(listed.as_array().unwrap().len(), 3);

    match rx.try_recv().unwrap() {
        ServerMessage::State { snapshot, echo } => {
            assert_eq!(snapshot.queue_length, 3);
            assert_eq!(echo, None);
        }
        other => panic!("expected state, got {:?}", other),
    }
}

#[tokio::test]
async fn rescan_keeps_playing_track_that_still_exists() {
    let app = library_app().await;
    let id = track_id_for("b/second.mp3");
    app.state.hub.apply(|c| c.play(id)).unwrap();

    common::write_file(app.dir.path(), "0/zero.mp3", &[0; 3]);
    app.request(
        Request::builder()
            .method(Method::POST)
            .uri("/rescan")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    let json = body_json(app.get("/state").await).await;
    assert_eq!(json["songId"], id);
    assert_eq!(json["currentIndex"], 2);
    assert_eq!(json["isPlaying"], true);
}

#[tokio::test]
async fn root_serves_embedded_index() {
    let app = library_app().await;

    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("Mooseek"));
}

#[tokio::test]
async fn assets_are_served_by_exact_path() {
    let app = library_app().await;

    let script = app.get("/app.js").await;
    assert_eq!(script.status(), StatusCode::OK);
    let content_type = script.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.contains("javascript"));

    assert_eq!(app.get("/index.htm").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get("/missing/page").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn not_found_bodies_are_json() {
    let app = library_app().await;

    let response = app.get("/nothing-here").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json["error"].is_string());
}
