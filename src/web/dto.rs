//! Request and response bodies.

use serde::{Deserialize, Serialize};

/// Query parameters for `GET /list`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub prefix: Option<String>,
}

/// Body of `POST /create_folder`.
#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    #[serde(default)]
    pub folder_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            key: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct PresignResponse {
    pub download_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

/// One row of a folder listing.
#[derive(Debug, Serialize)]
pub struct EntryDescriptor {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Name relative to the listed prefix; folders keep their trailing `/`.
    pub name: String,
    /// Full object key or folder prefix.
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub prefix: String,
    pub files: Vec<EntryDescriptor>,
}

#[derive(Debug, Serialize)]
pub struct DeleteFolderResponse {
    pub message: String,
    pub deleted: usize,
}
