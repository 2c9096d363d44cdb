//! S3-compatible object store backed by the AWS SDK.
//!
//! - `types`: the store handle, endpoint resolution and error mapping
//! - `list`: paginated prefix and delimited folder listing
//! - `objects`: head, ranged get and deletes
//! - `upload`: whole-object PUT
//! - `presigned`: presigned GET URLs

mod list;
mod objects;
mod presigned;
mod types;
mod upload;

pub use list::{list_all_keys, list_folder_children};
pub use objects::{delete_object, delete_objects, get_object_range, head_object_size};
pub use presigned::generate_presigned_url;
pub use types::AwsStore;
pub use upload::upload_content;

use crate::error::{StoreError, StoreResult};
use crate::namespace::Listing;
use crate::store::ObjectStore;
use async_trait::async_trait;
use bytes::Bytes;

#[async_trait]
impl ObjectStore for AwsStore {
    async fn put(&self, key: &str, body: Bytes, content_type: Option<&str>) -> StoreResult<()> {
        upload_content(self, key, body, content_type).await
    }

    async fn head_size(&self, key: &str) -> StoreResult<u64> {
        head_object_size(self, key).await
    }

    async fn get_range(&self, key: &str, start: u64, end: u64) -> StoreResult<Bytes> {
        get_object_range(self, key, start, end).await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        delete_object(self, key).await
    }

    async fn list_by_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        list_all_keys(self, prefix).await
    }

    async fn list_children(&self, prefix: &str) -> StoreResult<Listing> {
        list_folder_children(self, prefix).await
    }

    async fn presign(&self, key: &str, ttl_secs: u32) -> StoreResult<String> {
        generate_presigned_url(self, key, u64::from(ttl_secs)).await
    }

    async fn delete_many(&self, keys: &[String]) -> Vec<(String, StoreError)> {
        delete_objects(self, keys).await
    }
}
