//! Mooseek Server Library
//!
//! Local-network streaming server: catalog listing, range-seekable audio,
//! companion UI files, and a WebSocket hub that keeps every client in step
//! with one authoritative playback state.
//!
//! This library exposes the router and its parts for testing.

pub mod api;
pub mod config;
pub mod error;
pub mod hub;
pub mod services;
pub mod state;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use hub::SyncHub;
pub use services::{AssetBundle, CatalogService, FileResolver};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use mooseek_metadata::DirectoryCatalog;
use mooseek_playback::{PlaybackCoordinator, SharedCoordinator};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build every route over `app_state`
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health::health))
        .route("/list", get(api::catalog::list_tracks))
        .route("/rescan", post(api::catalog::rescan))
        .route("/state", get(api::playback::get_state))
        .route("/queue", get(api::playback::get_queue))
        .route("/stream/*path", get(api::stream::stream_file))
        .route("/ws", get(hub::socket::sync_socket))
        .fallback(api::assets::serve_asset)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// Assemble state from configuration: scan the library, load the coordinator
pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let provider = DirectoryCatalog::new(config.library.root.clone(), config.library.scan_config());
    let catalog = Arc::new(CatalogService::new(Arc::new(provider)));
    let tracks = catalog.refresh().await;

    let assets = match &config.assets.dir {
        Some(dir) => AssetBundle::from_dir(dir)?,
        None => AssetBundle::embedded(),
    };

    let mut coordinator = PlaybackCoordinator::new(config.playback.clone());
    coordinator.load_library(tracks.as_ref().clone());

    Ok(AppState::new(
        catalog,
        Arc::new(FileResolver::new(config.library.root.clone())),
        Arc::new(assets),
        SharedCoordinator::new(coordinator),
        config.sync.client_buffer,
    ))
}
