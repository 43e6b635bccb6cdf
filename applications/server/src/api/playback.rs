/// Read-only playback routes
use crate::state::AppState;
use axum::{extract::State, Json};
use mooseek_core::{PlaybackSnapshot, TrackId};
use serde::Serialize;

/// GET /state - current playback snapshot
pub async fn get_state(State(state): State<AppState>) -> Json<PlaybackSnapshot> {
    Json(state.coordinator.snapshot().as_ref().clone())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueResponse {
    pub version: u64,
    pub current_index: i64,
    pub ids: Vec<TrackId>,
}

/// GET /queue - track ids in playback order
pub async fn get_queue(State(state): State<AppState>) -> Json<QueueResponse> {
    let response = state.coordinator.read(|coordinator| QueueResponse {
        version: coordinator.queue().version(),
        current_index: coordinator
            .current_index()
            .map_or(-1, |index| index as i64),
        ids: coordinator.queue().ids(),
    });
    Json(response)
}
