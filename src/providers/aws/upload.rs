use super::types::{map_sdk_error, AwsStore};
use crate::error::StoreResult;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

/// Upload a whole object with a single PUT
pub async fn upload_content(
    store: &AwsStore,
    key: &str,
    content: Bytes,
    content_type: Option<&str>,
) -> StoreResult<()> {
    let mut request = store
        .client
        .put_object()
        .bucket(&store.bucket)
        .key(key)
        .content_length(content.len() as i64)
        .body(ByteStream::from(content));

    if let Some(ct) = content_type {
        request = request.content_type(ct);
    }

    request.send().await.map_err(|e| map_sdk_error(key, e))?;
    Ok(())
}
