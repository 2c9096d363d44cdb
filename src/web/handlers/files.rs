//! File handlers: upload, download, presign, delete.

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use bytes::Bytes;
use log::{info, warn};
use std::sync::Arc;

use super::AppState;
use crate::namespace::upload_key;
use crate::transfer::{content_disposition, prepare_download};
use crate::web::dto::{MessageResponse, PresignResponse};
use crate::web::error::ApiError;

/// POST /upload - multipart form with `file` and an optional `folder`.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut folder: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("failed to read multipart field: {}", e);
        ApiError::bad_request(e.body_text())
    })? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(|e| {
                    warn!("failed to read upload body: {}", e);
                    ApiError::bad_request(e.body_text())
                })?;
                file = Some((filename, data));
            }
            Some("folder") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                folder = Some(text);
            }
            _ => {}
        }
    }

    let (filename, data) = file.ok_or_else(|| ApiError::bad_request("No file part"))?;
    if filename.trim().is_empty() {
        return Err(ApiError::bad_request("No selected file"));
    }

    let key = upload_key(folder.as_deref(), &filename)?;
    let content_type = mime_guess::from_path(&key)
        .first()
        .map(|m| m.essence_str().to_string());
    let size = data.len();

    state.store.put(&key, data, content_type.as_deref()).await?;
    info!("uploaded {} ({} bytes)", key, size);

    Ok(Json(
        MessageResponse::new("File uploaded successfully").with_key(key),
    ))
}

/// GET /download/*key - stream the object in bounded chunks.
///
/// Headers are fixed before the first chunk. A failure after that point can
/// only cut the body short of `Content-Length`.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    let prepared = prepare_download(state.store.clone(), &key, &state.download).await?;
    info!(
        "streaming {} ({} bytes) as {}",
        prepared.key, prepared.total_size, prepared.file_name
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, prepared.content_type.as_str())
        .header(header::CONTENT_LENGTH, prepared.total_size)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&prepared.file_name),
        )
        .body(Body::from_stream(prepared.chunks))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {}", e)))
}

/// GET /presign/*key - time-limited direct link.
pub async fn presign(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<PresignResponse>, ApiError> {
    let download_url = state.store.presign(&key, state.presign_ttl_secs()).await?;
    Ok(Json(PresignResponse { download_url }))
}

/// DELETE /delete/*key - remove one object. Missing keys succeed.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if key.ends_with('/') {
        return Err(ApiError::bad_request(
            "Folders are deleted with /delete_folder",
        ));
    }

    state.store.delete(&key).await?;
    info!("deleted {}", key);
    Ok(Json(MessageResponse::new("File deleted successfully").with_key(key)))
}
