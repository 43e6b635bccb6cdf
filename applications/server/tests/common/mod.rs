/// Common test utilities and fixtures
use axum::{body::Body, http::Request, response::Response, Router};
use mooseek_server::{build_state, create_router, AppState, ServerConfig};
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt;

/// A router over a temporary library directory
pub struct TestApp {
    pub dir: TempDir,
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    /// Build the app over a library containing `files` (relative path, contents)
    pub async fn with_files(files: &[(&str, Vec<u8>)]) -> Self {
        let dir = TempDir::new().unwrap();
        for (name, contents) in files {
            write_file(dir.path(), name, contents);
        }

        let mut config = ServerConfig::default();
        config.library.root = dir.path().to_path_buf();
        config.playback.seed = Some(42);

        let state = build_state(&config).await.unwrap();
        let router = create_router(state.clone());
        Self { dir, state, router }
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn write_file(root: &Path, name: &str, contents: &[u8]) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// Deterministic bytes so sub-ranges can be checked by value
pub fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
