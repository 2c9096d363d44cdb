use crate::config::StorageConfig;
use crate::error::StoreError;
use crate::providers::s3_client::{create_s3_client, S3ClientConfig};
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::Client;
use std::time::Duration;

/// S3-compatible bucket handle (AWS S3, Cloudflare R2, MinIO).
///
/// The SDK client is cheap to clone and safe to share between requests.
#[derive(Debug, Clone)]
pub struct AwsStore {
    pub(super) client: Client,
    pub(super) bucket: String,
}

impl AwsStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub async fn connect(config: &StorageConfig) -> Self {
        let endpoint_url = build_endpoint_url(config);
        // R2 only accepts the "auto" region and path-style addressing.
        let is_r2 = config.r2_account_id.is_some() && config.endpoint_url.is_none();
        let region = if is_r2 { "auto" } else { config.region.as_str() };

        let client = create_s3_client(&S3ClientConfig {
            access_key_id: &config.access_key_id,
            secret_access_key: &config.secret_access_key,
            region,
            endpoint_url: endpoint_url.as_deref(),
            force_path_style: config.force_path_style || is_r2,
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            operation_timeout: Duration::from_secs(config.operation_timeout_secs),
        })
        .await;

        Self::new(client, &config.bucket)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

pub(crate) fn build_endpoint_url(config: &StorageConfig) -> Option<String> {
    if let Some(url) = config.endpoint_url.as_deref().map(str::trim) {
        if !url.is_empty() {
            return Some(url.to_string());
        }
    }
    let account_id = config.r2_account_id.as_deref()?.trim();
    if account_id.is_empty() {
        return None;
    }
    Some(format!("https://{}.r2.cloudflarestorage.com", account_id))
}

/// Map an SDK failure onto the store taxonomy.
pub(super) fn map_sdk_error<E>(key: &str, err: SdkError<E, HttpResponse>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let status = err.raw_response().map(|r| r.status().as_u16());
    match (status, err.code()) {
        (_, Some("NoSuchKey" | "NotFound")) | (Some(404), _) => StoreError::NotFound(key.to_string()),
        (_, Some("AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch"))
        | (Some(401 | 403), _) => {
            StoreError::PermissionDenied(DisplayErrorContext(&err).to_string())
        }
        _ => StoreError::Unavailable(DisplayErrorContext(&err).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> StorageConfig {
        StorageConfig {
            bucket: "files".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn endpoint_url_prefers_explicit_endpoint() {
        let mut config = storage();
        assert_eq!(build_endpoint_url(&config), None);

        config.r2_account_id = Some("abc123".to_string());
        assert_eq!(
            build_endpoint_url(&config).as_deref(),
            Some("https://abc123.r2.cloudflarestorage.com")
        );

        config.endpoint_url = Some("http://localhost:9000".to_string());
        assert_eq!(
            build_endpoint_url(&config).as_deref(),
            Some("http://localhost:9000")
        );
    }

    #[test]
    fn blank_endpoint_is_ignored() {
        let mut config = storage();
        config.endpoint_url = Some("  ".to_string());
        assert_eq!(build_endpoint_url(&config), None);
    }
}
