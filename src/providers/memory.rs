//! In-process object store for local runs and tests.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{StoreError, StoreResult};
use crate::store::ObjectStore;

#[derive(Default)]
struct Inner {
    objects: BTreeMap<String, Bytes>,
    range_reads: Vec<(String, u64, u64)>,
    failing_deletes: BTreeSet<String>,
    fail_reads_from: Option<u64>,
}

/// Keys and bodies held in a `BTreeMap`.
///
/// Every range read is recorded, and deletes or reads can be made to fail, so
/// transfer and cascade behavior can be observed without a real bucket.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objects<I, K, V>(objects: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Bytes>,
    {
        let store = Self::new();
        for (key, value) in objects {
            store.insert(key, value);
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<Bytes>) {
        self.lock().objects.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.lock().objects.get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }

    /// `(key, start, end)` of every range read so far.
    pub fn range_reads(&self) -> Vec<(String, u64, u64)> {
        self.lock().range_reads.clone()
    }

    /// Make every delete of `key` fail.
    pub fn fail_delete(&self, key: impl Into<String>) {
        self.lock().failing_deletes.insert(key.into());
    }

    /// Make range reads starting at or after `offset` fail.
    pub fn fail_reads_from(&self, offset: u64) {
        self.lock().fail_reads_from = Some(offset);
    }

    /// Undo [`MemoryStore::fail_delete`] and [`MemoryStore::fail_reads_from`].
    pub fn clear_faults(&self) {
        let mut inner = self.lock();
        inner.failing_deletes.clear();
        inner.fail_reads_from = None;
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, key: &str, body: Bytes, _content_type: Option<&str>) -> StoreResult<()> {
        self.lock().objects.insert(key.to_string(), body);
        Ok(())
    }

    async fn head_size(&self, key: &str) -> StoreResult<u64> {
        self.lock()
            .objects
            .get(key)
            .map(|body| body.len() as u64)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn get_range(&self, key: &str, start: u64, end: u64) -> StoreResult<Bytes> {
        let mut inner = self.lock();
        inner.range_reads.push((key.to_string(), start, end));

        if inner.fail_reads_from.is_some_and(|offset| start >= offset) {
            return Err(StoreError::Unavailable(format!(
                "injected read failure at {}",
                start
            )));
        }

        let body = inner
            .objects
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        let len = body.len() as u64;
        let start = start.min(len) as usize;
        let end = end.min(len) as usize;
        Ok(body.slice(start..end.max(start)))
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let mut inner = self.lock();
        if inner.failing_deletes.contains(key) {
            return Err(StoreError::Unavailable(format!(
                "injected delete failure for {}",
                key
            )));
        }
        inner.objects.remove(key);
        Ok(())
    }

    async fn list_by_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .lock()
            .objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn presign(&self, key: &str, _ttl_secs: u32) -> StoreResult<String> {
        Err(StoreError::Unsupported(format!(
            "in-memory store cannot presign {}",
            key
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_only_keys_under_prefix() {
        let store = MemoryStore::with_objects([
            ("a/1", "x"),
            ("a/b/2", "y"),
            ("ab", "z"),
            ("b", "w"),
        ]);
        assert_eq!(store.list_by_prefix("a/").await.unwrap(), vec!["a/1", "a/b/2"]);
        assert_eq!(store.list_by_prefix("").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::with_objects([("k", "v")]);
        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();
        store.delete("never-existed").await.unwrap();
        assert!(store.keys().is_empty());
    }

    #[tokio::test]
    async fn ranges_are_half_open_and_recorded() {
        let store = MemoryStore::with_objects([("k", "0123456789")]);
        assert_eq!(store.get_range("k", 2, 5).await.unwrap(), "234");
        assert_eq!(store.head_size("k").await.unwrap(), 10);
        assert_eq!(store.range_reads(), vec![("k".to_string(), 2, 5)]);
        assert!(matches!(
            store.head_size("missing").await,
            Err(StoreError::NotFound(_))
        ));
    }
}
