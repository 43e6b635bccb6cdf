/// Catalog listing and rescan routes
use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// GET /list - every track in the catalog, independent of playback state
pub async fn list_tracks(State(state): State<AppState>) -> Response {
    let tracks = state.catalog.tracks();
    Json(tracks.as_slice()).into_response()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RescanResponse {
    pub tracks: usize,
    pub queue_length: usize,
    pub revision: u64,
}

/// POST /rescan - re-list the library and reload the coordinator
pub async fn rescan(State(state): State<AppState>) -> Json<RescanResponse> {
    // The scan runs before the coordinator lock is taken.
    let tracks = state.catalog.refresh().await;
    let library = tracks.as_ref().clone();

    let (queue_length, revision) = state.hub.apply(|coordinator| {
        coordinator.load_library(library);
        (coordinator.queue().len(), coordinator.revision())
    });

    tracing::info!("Rescan loaded {} tracks", tracks.len());
    Json(RescanResponse {
        tracks: tracks.len(),
        queue_length,
        revision,
    })
}
