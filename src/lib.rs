//! bucketfm - a web file manager for S3-compatible object storage.
//!
//! Modules:
//! - `store`: the object store contract
//! - `providers`: S3/R2/MinIO and in-memory stores
//! - `namespace`: virtual folders over flat keys
//! - `folders`: folder markers and cascading delete
//! - `transfer`: chunked streaming downloads
//! - `web`: axum routes
//! - `config`, `logging`, `error`: ambient plumbing

pub mod config;
pub mod error;
pub mod folders;
pub mod logging;
pub mod namespace;
pub mod providers;
pub mod store;
pub mod transfer;
pub mod web;

pub use config::{Backend, Config, ConfigError};
pub use error::{StoreError, StoreResult};
pub use providers::{AwsStore, MemoryStore};
pub use store::ObjectStore;
pub use transfer::{DownloadOptions, DownloadVia};

use std::sync::Arc;

/// Build the configured object store.
pub async fn connect_store(config: &config::StorageConfig) -> Arc<dyn ObjectStore> {
    match config.backend {
        Backend::S3 => {
            let store = AwsStore::connect(config).await;
            log::info!("using bucket '{}'", store.bucket());
            Arc::new(store)
        }
        Backend::Memory => {
            log::warn!("using the in-memory store; nothing is persisted");
            Arc::new(MemoryStore::new())
        }
    }
}

/// Download options derived from the storage configuration.
pub fn download_options(config: &config::StorageConfig) -> DownloadOptions {
    DownloadOptions {
        via: config.download_via,
        presign_ttl_secs: config.presign_ttl_secs,
        ..DownloadOptions::default()
    }
}
