//! Static preview server for frozen output

use std::path::{Component, Path, PathBuf};

use axum::{
    Router,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use frostline_core::url_to_path;
use tower_http::services::ServeDir;

/// Create the preview router.
///
/// Files are served as they are on disk. A path with no matching file is
/// mapped the way the freezer names its files, so `/hello` serves
/// `hello.html`.
pub fn create_router(output_dir: &Path) -> Router {
    let root = output_dir.to_path_buf();

    Router::new().fallback_service(
        ServeDir::new(output_dir).fallback(get(move |uri: Uri| frozen_page(root.clone(), uri))),
    )
}

async fn frozen_page(root: PathBuf, uri: Uri) -> Response {
    let relative = url_to_path(uri.path());
    let relative = Path::new(relative.trim_start_matches('/'));

    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return StatusCode::NOT_FOUND.into_response();
    }

    match tokio::fs::read(root.join(relative)).await {
        Ok(bytes) => Html(bytes).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}
