use super::types::AwsStore;
use crate::error::{StoreError, StoreResult};
use aws_sdk_s3::presigning::PresigningConfig;
use std::time::Duration;

/// Generate a presigned GET URL for object access
pub async fn generate_presigned_url(
    store: &AwsStore,
    key: &str,
    expires_in_secs: u64,
) -> StoreResult<String> {
    let presigning_config = PresigningConfig::builder()
        .expires_in(Duration::from_secs(expires_in_secs))
        .build()
        .map_err(|e| StoreError::InvalidInput(format!("invalid presign ttl: {}", e)))?;

    let presigned_request = store
        .client
        .get_object()
        .bucket(&store.bucket)
        .key(key)
        .presigned(presigning_config)
        .await
        .map_err(|e| StoreError::Unavailable(format!("failed to presign {}: {}", key, e)))?;

    Ok(presigned_request.uri().to_string())
}
