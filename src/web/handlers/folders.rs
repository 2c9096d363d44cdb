//! Listing and folder lifecycle handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use log::{debug, warn};
use mime_guess::Mime;
use std::sync::Arc;

use super::AppState;
use crate::error::StoreError;
use crate::folders::{create_folder as create_folder_marker, delete_folder as delete_folder_tree};
use crate::namespace::{normalize_prefix, relative_name};
use crate::web::dto::{
    CreateFolderRequest, DeleteFolderResponse, EntryDescriptor, EntryKind, ListQuery,
    ListResponse, MessageResponse,
};
use crate::web::error::ApiError;

/// Types a browser can show inline from a presigned link.
fn is_previewable(mime: &Mime) -> bool {
    matches!(
        mime.type_().as_str(),
        "image" | "video" | "audio" | "text"
    ) || mime.essence_str() == "application/pdf"
}

async fn preview_url(state: &AppState, key: &str) -> Option<String> {
    match state.store.presign(key, state.presign_ttl_secs()).await {
        Ok(url) => Some(url),
        Err(StoreError::Unsupported(_)) => None,
        Err(e) => {
            warn!("no preview link for {}: {}", key, e);
            None
        }
    }
}

/// GET /list?prefix= - immediate child folders and files of a prefix.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let prefix = normalize_prefix(query.prefix.as_deref().unwrap_or_default());
    let listing = state.store.list_children(&prefix).await?;
    debug!(
        "list '{}': {} folders, {} files",
        prefix,
        listing.folders.len(),
        listing.files.len()
    );

    let mut entries = Vec::with_capacity(listing.folders.len() + listing.files.len());
    for folder in listing.folders {
        entries.push(EntryDescriptor {
            kind: EntryKind::Folder,
            name: relative_name(&prefix, &folder).to_string(),
            key: folder,
            mime_type: None,
            preview_url: None,
        });
    }
    for key in listing.files {
        let mime = mime_guess::from_path(&key).first();
        let preview_url = match &mime {
            Some(m) if is_previewable(m) => preview_url(&state, &key).await,
            _ => None,
        };
        entries.push(EntryDescriptor {
            kind: EntryKind::File,
            name: relative_name(&prefix, &key).to_string(),
            mime_type: mime.map(|m| m.essence_str().to_string()),
            preview_url,
            key,
        });
    }

    Ok(Json(ListResponse {
        prefix,
        files: entries,
    }))
}

/// POST /create_folder - `{"folder_name": "a/b"}` writes marker `a/b/`.
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateFolderRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let name = request
        .folder_name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Folder name is required"))?;

    let key = create_folder_marker(state.store.as_ref(), &name).await?;
    Ok(Json(
        MessageResponse::new("Folder created successfully").with_key(key),
    ))
}

/// DELETE /delete_folder/*key - cascade delete of everything under the prefix.
pub async fn delete_folder(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<DeleteFolderResponse>, ApiError> {
    let report = delete_folder_tree(state.store.as_ref(), &name).await?;
    if !report.is_complete() {
        return Err(ApiError::partial_cascade(&report));
    }

    Ok(Json(DeleteFolderResponse {
        message: "Folder deleted successfully".to_string(),
        deleted: report.deleted.len(),
    }))
}
