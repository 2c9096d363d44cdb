//! HTTP handlers and the state they share.

pub mod files;
pub mod folders;

pub use files::*;
pub use folders::*;

use std::sync::Arc;

use crate::store::ObjectStore;
use crate::transfer::DownloadOptions;

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub store: Arc<dyn ObjectStore>,
    pub download: DownloadOptions,
}

impl AppState {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            download: DownloadOptions::default(),
        }
    }

    pub fn with_download_options(mut self, download: DownloadOptions) -> Self {
        self.download = download;
        self
    }

    pub fn presign_ttl_secs(&self) -> u32 {
        self.download.presign_ttl_secs
    }
}
