use super::types::{map_sdk_error, AwsStore};
use crate::error::{StoreError, StoreResult};
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use bytes::Bytes;

/// S3 accepts at most this many keys per DeleteObjects call.
const DELETE_BATCH_SIZE: usize = 1000;

pub async fn head_object_size(store: &AwsStore, key: &str) -> StoreResult<u64> {
    let response = store
        .client
        .head_object()
        .bucket(&store.bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| map_sdk_error(key, e))?;

    object_size(key, response.content_length())
}

/// A HEAD without a usable length cannot size a download.
fn object_size(key: &str, content_length: Option<i64>) -> StoreResult<u64> {
    match content_length {
        Some(len) if len >= 0 => Ok(len as u64),
        other => Err(StoreError::Unavailable(format!(
            "no content length for {}: {:?}",
            key, other
        ))),
    }
}

/// Fetch `[start, end)` with a single ranged GET.
pub async fn get_object_range(store: &AwsStore, key: &str, start: u64, end: u64) -> StoreResult<Bytes> {
    if end <= start {
        return Ok(Bytes::new());
    }

    let response = store
        .client
        .get_object()
        .bucket(&store.bucket)
        .key(key)
        .range(format!("bytes={}-{}", start, end - 1))
        .send()
        .await
        .map_err(|e| map_sdk_error(key, e))?;

    let body = response
        .body
        .collect()
        .await
        .map_err(|e| StoreError::Unavailable(format!("failed to read {}: {}", key, e)))?;

    Ok(body.into_bytes())
}

/// Delete a single object. S3 answers 204 for missing keys too.
pub async fn delete_object(store: &AwsStore, key: &str) -> StoreResult<()> {
    store
        .client
        .delete_object()
        .bucket(&store.bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| map_sdk_error(key, e))?;
    Ok(())
}

/// Delete keys in batches, collecting the ones that failed.
pub async fn delete_objects(store: &AwsStore, keys: &[String]) -> Vec<(String, StoreError)> {
    let mut failed = Vec::new();

    for batch in keys.chunks(DELETE_BATCH_SIZE) {
        let objects: Result<Vec<ObjectIdentifier>, _> = batch
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect();

        let delete = match objects.and_then(|objects| {
            Delete::builder()
                .set_objects(Some(objects))
                .quiet(true)
                .build()
        }) {
            Ok(delete) => delete,
            Err(e) => {
                failed.extend(
                    batch
                        .iter()
                        .map(|k| (k.clone(), StoreError::InvalidInput(e.to_string()))),
                );
                continue;
            }
        };

        match store
            .client
            .delete_objects()
            .bucket(&store.bucket)
            .delete(delete)
            .send()
            .await
        {
            Ok(output) => {
                for err in output.errors() {
                    let key = err.key().unwrap_or_default().to_string();
                    let message = format!(
                        "{}: {}",
                        err.code().unwrap_or("Error"),
                        err.message().unwrap_or_default()
                    );
                    failed.push((key, StoreError::Unavailable(message)));
                }
            }
            Err(e) => {
                let message = map_sdk_error("batch", e).to_string();
                failed.extend(
                    batch
                        .iter()
                        .map(|k| (k.clone(), StoreError::Unavailable(message.clone()))),
                );
            }
        }
    }

    failed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_head_length_is_unavailable() {
        assert_eq!(object_size("k", Some(0)).unwrap(), 0);
        assert_eq!(object_size("k", Some(42)).unwrap(), 42);
        assert!(matches!(object_size("k", None), Err(StoreError::Unavailable(_))));
        assert!(matches!(object_size("k", Some(-1)), Err(StoreError::Unavailable(_))));
    }
}
