/// Companion UI files
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::State,
    http::{header, Method, Uri},
    response::{IntoResponse, Response},
};

/// Fallback route: serve a bundled file by exact path, `/` as `index.html`
pub async fn serve_asset(State(state): State<AppState>, method: Method, uri: Uri) -> Result<Response> {
    if method != Method::GET && method != Method::HEAD {
        return Err(ServerError::NotFound(uri.path().to_string()));
    }

    let asset = state
        .assets
        .get(uri.path())
        .await?
        .ok_or_else(|| ServerError::NotFound(uri.path().to_string()))?;

    Ok(([(header::CONTENT_TYPE, asset.content_type)], asset.body).into_response())
}
