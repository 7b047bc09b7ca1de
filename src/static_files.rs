use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use std::path::{Component, Path};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

const ENTRY_DOCUMENT: &str = "index.html";
const ASSET_CACHE: &str = "public, max-age=31536000, immutable";
const ENTRY_CACHE: &str = "no-cache, no-store, must-revalidate";

/// Serves the client bundle. Paths with no file behind them get the entry document so
/// client-side routes resolve.
pub async fn serve_bundle(State(state): State<AppState>, request: Request) -> Response {
    let entry = state.dist_dir.join(ENTRY_DOCUMENT);
    let serves_entry = serves_entry_document(&state.dist_dir, request.uri().path()).await;
    let service = ServeDir::new(&state.dist_dir).fallback(ServeFile::new(entry));

    let mut response = match service.oneshot(request).await {
        Ok(response) => response.map(Body::new).into_response(),
        Err(never) => match never {},
    };

    if !response.status().is_success() {
        return response;
    }

    let headers = response.headers_mut();
    if serves_entry {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(ENTRY_CACHE));
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    } else {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(ASSET_CACHE));
    }
    response
}

/// Whether `uri_path` ends up at the entry document: it names `index.html` itself, a
/// directory (served through its `index.html`), or nothing on disk (the fallback).
async fn serves_entry_document(dist_dir: &Path, uri_path: &str) -> bool {
    let relative = Path::new(uri_path.trim_start_matches('/'));
    if relative
        .components()
        .any(|component| !matches!(component, Component::Normal(_)))
    {
        return false;
    }
    if relative.file_name().is_some_and(|name| name == ENTRY_DOCUMENT) {
        return true;
    }
    match tokio::fs::metadata(dist_dir.join(relative)).await {
        Ok(metadata) => metadata.is_dir(),
        Err(_) => true,
    }
}
