//! Streaming downloads out of the object store.
//!
//! The object is sized first, then pulled through `range-dl` one chunk at a
//! time. Either the store itself or a presigned URL serves the ranges.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use range_dl::{start_download, HttpRangeSource, RangeError, RangeSource, CHUNK_SIZE};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{StoreError, StoreResult};
use crate::namespace::file_name;
use crate::store::ObjectStore;

/// Where range reads are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadVia {
    /// Ranged GETs through the store client.
    #[default]
    Store,
    /// Plain HTTP `Range:` requests against a presigned URL.
    Presigned,
}

/// Reads one key through [`ObjectStore::head_size`] and
/// [`ObjectStore::get_range`].
pub struct StoreRangeSource {
    store: Arc<dyn ObjectStore>,
    key: String,
}

impl StoreRangeSource {
    pub fn new(store: Arc<dyn ObjectStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

#[async_trait]
impl RangeSource for StoreRangeSource {
    async fn size(&self) -> Result<u64, RangeError> {
        Ok(self.store.head_size(&self.key).await?)
    }

    async fn read_range(&self, start: u64, end: u64) -> Result<Bytes, RangeError> {
        Ok(self.store.get_range(&self.key, start, end).await?)
    }
}

/// A download whose framing is fixed: size, filename and type are known and
/// the body has not started.
pub struct PreparedDownload {
    pub key: String,
    pub file_name: String,
    pub content_type: String,
    pub total_size: u64,
    pub chunks: BoxStream<'static, Result<Bytes, RangeError>>,
}

/// Options shared by every download.
#[derive(Clone)]
pub struct DownloadOptions {
    pub via: DownloadVia,
    pub chunk_size: u64,
    pub presign_ttl_secs: u32,
    pub http: reqwest::Client,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            via: DownloadVia::Store,
            chunk_size: CHUNK_SIZE,
            presign_ttl_secs: 3600,
            http: reqwest::Client::new(),
        }
    }
}

/// Size `key` and return its chunk stream.
///
/// Fails with `NotFound` before anything is streamed if the key is absent.
pub async fn prepare_download(
    store: Arc<dyn ObjectStore>,
    key: &str,
    options: &DownloadOptions,
) -> StoreResult<PreparedDownload> {
    if key.is_empty() || key.ends_with('/') {
        return Err(StoreError::InvalidInput(
            "A file key is required".to_string(),
        ));
    }

    let download = match options.via {
        DownloadVia::Store => {
            let source = StoreRangeSource::new(store, key);
            start_download(key, source, options.chunk_size).await?
        }
        DownloadVia::Presigned => {
            let url = store.presign(key, options.presign_ttl_secs).await?;
            let source = HttpRangeSource::new(options.http.clone(), url);
            start_download(key, source, options.chunk_size).await?
        }
    };

    let file_name = file_name(key).to_string();
    let content_type = mime_guess::from_path(&file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(PreparedDownload {
        key: download.key,
        file_name,
        content_type,
        total_size: download.total_size,
        chunks: download.chunks,
    })
}

/// `Content-Disposition` value naming only the last key segment.
///
/// Control characters, quotes and backslashes are dropped from the plain
/// `filename`; non-ASCII names also get an RFC 5987 `filename*`.
pub fn content_disposition(file_name: &str) -> String {
    let sanitized: String = file_name
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            c if !c.is_ascii() => '_',
            c => c,
        })
        .collect();

    if sanitized == file_name {
        return format!("attachment; filename=\"{}\"", file_name);
    }

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized,
        urlencoding::encode(file_name)
    )
}
