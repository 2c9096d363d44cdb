//! Virtual folder lifecycle: marker creation and cascading delete.

use bytes::Bytes;
use log::{info, warn};
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::namespace::{folder_marker_key, normalize_prefix};
use crate::store::ObjectStore;

/// Create a folder by writing its zero-byte marker. Returns the marker key.
///
/// `"a"` and `"a/"` write the same key, so creating twice leaves one marker.
pub async fn create_folder(store: &dyn ObjectStore, name: &str) -> StoreResult<String> {
    let key = folder_marker_key(name)?;
    store.put(&key, Bytes::new(), None).await?;
    info!("created folder marker {}", key);
    Ok(key)
}

/// One key a cascade could not remove.
#[derive(Debug, Clone, Serialize)]
pub struct FailedDelete {
    pub key: String,
    pub error: String,
}

/// Outcome of a folder delete. Not atomic: a failure part-way leaves the
/// remaining keys in place and lists them in `failed`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CascadeReport {
    pub prefix: String,
    pub deleted: Vec<String>,
    pub failed: Vec<FailedDelete>,
}

impl CascadeReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_keys(&self) -> Vec<String> {
        self.failed.iter().map(|f| f.key.clone()).collect()
    }

    /// Retry only the keys that failed last time.
    pub async fn retry(self, store: &dyn ObjectStore) -> CascadeReport {
        let keys = self.failed_keys();
        let mut report = delete_keys(store, &self.prefix, keys).await;
        let mut deleted = self.deleted;
        deleted.append(&mut report.deleted);
        report.deleted = deleted;
        report
    }
}

async fn delete_keys(store: &dyn ObjectStore, prefix: &str, keys: Vec<String>) -> CascadeReport {
    let failures = store.delete_many(&keys).await;

    let failed: Vec<FailedDelete> = failures
        .into_iter()
        .map(|(key, error)| FailedDelete {
            key,
            error: error.to_string(),
        })
        .collect();
    let deleted = keys
        .into_iter()
        .filter(|key| !failed.iter().any(|f| &f.key == key))
        .collect();

    CascadeReport {
        prefix: prefix.to_string(),
        deleted,
        failed,
    }
}

/// Delete a folder: every key under its prefix, then the marker itself.
///
/// Listing happens once up front; keys written under the prefix while the
/// cascade runs are not picked up.
pub async fn delete_folder(store: &dyn ObjectStore, name: &str) -> StoreResult<CascadeReport> {
    let prefix = normalize_prefix(name);
    if prefix.is_empty() {
        return Err(StoreError::InvalidInput(
            "Refusing to delete the bucket root".to_string(),
        ));
    }
    let prefix = folder_marker_key(&prefix)?;

    let mut keys = store.list_by_prefix(&prefix).await?;
    // Marker last, so a partial failure still shows the folder.
    keys.retain(|key| key != &prefix);
    keys.sort();
    keys.push(prefix.clone());

    let report = delete_keys(store, &prefix, keys).await;
    if report.is_complete() {
        info!(
            "deleted folder {} ({} keys)",
            prefix,
            report.deleted.len()
        );
    } else {
        warn!(
            "folder {} partially deleted: {} removed, {} failed",
            prefix,
            report.deleted.len(),
            report.failed.len()
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::list_children;
    use crate::providers::MemoryStore;

    #[tokio::test]
    async fn creating_twice_keeps_one_marker() {
        let store = MemoryStore::new();
        assert_eq!(create_folder(&store, "a").await.unwrap(), "a/");
        assert_eq!(create_folder(&store, "a/").await.unwrap(), "a/");
        assert_eq!(store.keys(), vec!["a/"]);
        assert_eq!(store.get("a/").unwrap().len(), 0);
    }

    #[tokio::test]
    async fn empty_folder_name_is_rejected() {
        let store = MemoryStore::new();
        assert!(matches!(
            create_folder(&store, "").await,
            Err(StoreError::InvalidInput(_))
        ));
        assert!(store.keys().is_empty());
    }

    #[tokio::test]
    async fn cascade_removes_all_descendants() {
        let store = MemoryStore::with_objects([
            ("a/", ""),
            ("a/b.txt", "b"),
            ("a/c/d.txt", "d"),
            ("ab.txt", "keep"),
            ("e.txt", "e"),
        ]);

        let report = delete_folder(&store, "a").await.unwrap();
        assert!(report.is_complete());
        assert_eq!(report.deleted, vec!["a/b.txt", "a/c/d.txt", "a/"]);
        assert_eq!(store.keys(), vec!["ab.txt", "e.txt"]);

        let root = list_children("", store.list_by_prefix("").await.unwrap());
        assert!(root.folders.is_empty());
    }

    #[tokio::test]
    async fn implicit_folder_without_marker_is_deleted() {
        let store = MemoryStore::with_objects([("logs/2024/jan.log", "x")]);
        let report = delete_folder(&store, "logs/").await.unwrap();
        assert!(report.is_complete());
        assert!(store.keys().is_empty());
    }

    #[tokio::test]
    async fn partial_failure_reports_failed_keys_and_can_retry() {
        let store = MemoryStore::with_objects([("a/", ""), ("a/1", "1"), ("a/2", "2")]);
        store.fail_delete("a/2");

        let report = delete_folder(&store, "a").await.unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.failed_keys(), vec!["a/2"]);
        assert_eq!(report.deleted, vec!["a/1", "a/"]);
        assert_eq!(store.keys(), vec!["a/2"]);

        store.clear_faults();
        let report = report.retry(&store).await;
        assert!(report.is_complete());
        assert_eq!(report.deleted, vec!["a/1", "a/", "a/2"]);
        assert!(store.keys().is_empty());
    }

    #[tokio::test]
    async fn root_cannot_be_deleted() {
        let store = MemoryStore::with_objects([("e.txt", "e")]);
        assert!(matches!(
            delete_folder(&store, "/").await,
            Err(StoreError::InvalidInput(_))
        ));
        assert_eq!(store.keys(), vec!["e.txt"]);
    }
}
