//! The object store contract consumed by listing, folders and transfers.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{StoreError, StoreResult};
use crate::namespace::{self, Listing};

/// A remote key-value blob store.
///
/// One handle is shared read-only by every request; implementations keep no
/// per-request state.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write a whole object.
    async fn put(&self, key: &str, body: Bytes, content_type: Option<&str>) -> StoreResult<()>;

    /// Object size in bytes, without fetching the body.
    async fn head_size(&self, key: &str) -> StoreResult<u64>;

    /// Read the half-open byte range `[start, end)`.
    async fn get_range(&self, key: &str, start: u64, end: u64) -> StoreResult<Bytes>;

    /// Delete one object. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Every key starting with `prefix`, pagination already resolved.
    async fn list_by_prefix(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Immediate files and folders under `prefix` (already normalized).
    ///
    /// The default derives them from the full [`ObjectStore::list_by_prefix`]
    /// listing; stores with a delimiter listing override it.
    async fn list_children(&self, prefix: &str) -> StoreResult<Listing> {
        let keys = self.list_by_prefix(prefix).await?;
        Ok(namespace::list_children(prefix, &keys))
    }

    /// Time-limited GET link for one object.
    async fn presign(&self, key: &str, ttl_secs: u32) -> StoreResult<String>;

    /// Delete many objects, returning the keys that could not be deleted.
    ///
    /// The default loops over [`ObjectStore::delete`]; stores with a native
    /// batch delete override it.
    async fn delete_many(&self, keys: &[String]) -> Vec<(String, StoreError)> {
        let mut failed = Vec::new();
        for key in keys {
            if let Err(e) = self.delete(key).await {
                failed.push((key.clone(), e));
            }
        }
        failed
    }
}
