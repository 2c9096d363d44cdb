//! Router configuration.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_folder, delete_file, delete_folder, download, list, presign, upload, AppState,
};

/// Create the file manager router.
///
/// `max_upload_bytes` caps request bodies, which bounds whole-body uploads.
pub fn create_router(app_state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/upload", post(upload))
        .route("/download/*key", get(download))
        .route("/presign/*key", get(presign))
        .route("/list", get(list))
        .route("/delete/*key", delete(delete_file))
        .route("/create_folder", post(create_folder))
        .route("/delete_folder/*key", delete(delete_folder))
        .merge(create_health_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health_check))
}

async fn health_check() -> &'static str {
    "OK"
}
