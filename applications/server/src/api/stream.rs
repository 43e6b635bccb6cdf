/// Audio streaming with byte-range support
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use std::io::SeekFrom;
use std::path::Path as FsPath;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

/// GET /stream/*path
/// Stream a library file, honouring a single `Range: bytes=` request
pub async fn stream_file(
    Path(locator): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response> {
    let file_path = state.files.resolve(&locator).await?;

    let mut file = File::open(&file_path).await?;
    let file_size = file.metadata().await?.len();
    let mime_type = audio_mime(&file_path);

    let Some(range) = headers.get(header::RANGE) else {
        tracing::debug!("Streaming {} ({} bytes)", locator, file_size);
        let body = Body::from_stream(ReaderStream::new(file));

        return Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, mime_type)
            .header(header::CONTENT_LENGTH, file_size)
            .header(header::ACCEPT_RANGES, "bytes")
            .body(body)
            .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)));
    };

    let (start, end) = range
        .to_str()
        .ok()
        .and_then(|value| parse_range(value, file_size))
        .ok_or(ServerError::RangeNotSatisfiable { length: file_size })?;

    tracing::debug!("Streaming {} bytes {}-{}/{}", locator, start, end, file_size);

    let content_length = end - start + 1;
    file.seek(SeekFrom::Start(start)).await?;
    let body = Body::from_stream(ReaderStream::new(file.take(content_length)));

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, mime_type)
        .header(header::CONTENT_LENGTH, content_length)
        .header(
            header::CONTENT_RANGE,
            format!("bytes {}-{}/{}", start, end, file_size),
        )
        .header(header::ACCEPT_RANGES, "bytes")
        .body(body)
        .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))
}

/// Content type for an audio file, by extension
pub fn audio_mime(path: &FsPath) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        _ => "audio/*",
    }
}

/// Parse a single-range `Range` header against a file of `file_size` bytes.
///
/// Accepts `bytes=start-end`, `bytes=start-` and `bytes=-suffix`. Returns the
/// inclusive byte span, or `None` when the header is malformed, names more
/// than one range, or falls outside the file.
pub fn parse_range(range: &str, file_size: u64) -> Option<(u64, u64)> {
    let range = range.trim().strip_prefix("bytes=")?.trim();
    if range.contains(',') || file_size == 0 {
        return None;
    }

    let (start_str, end_str) = range.split_once('-')?;
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    let (start, end) = if start_str.is_empty() {
        let suffix: u64 = end_str.parse().ok()?;
        if suffix == 0 {
            return None;
        }
        (file_size.saturating_sub(suffix), file_size - 1)
    } else {
        let start: u64 = start_str.parse().ok()?;
        let end: u64 = if end_str.is_empty() {
            file_size - 1
        } else {
            end_str.parse().ok()?
        };
        (start, end)
    };

    (start <= end && end < file_size).then_some((start, end))
}
