use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::config::timeout::TimeoutConfig;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::Client;
use std::time::Duration;

pub struct S3ClientConfig<'a> {
    /// Empty keys fall back to the default AWS credential chain.
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub region: &'a str,
    pub endpoint_url: Option<&'a str>,
    pub force_path_style: bool,
    pub connect_timeout: Duration,
    pub operation_timeout: Duration,
}

fn timeouts(config: &S3ClientConfig<'_>) -> TimeoutConfig {
    TimeoutConfig::builder()
        .connect_timeout(config.connect_timeout)
        .operation_attempt_timeout(config.operation_timeout)
        .build()
}

pub async fn create_s3_client(config: &S3ClientConfig<'_>) -> Client {
    let mut builder = if config.access_key_id.is_empty() {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.to_string()))
            .load()
            .await;
        S3ConfigBuilder::from(&shared)
    } else {
        let credentials = Credentials::new(
            config.access_key_id,
            config.secret_access_key,
            None,
            None,
            "bucketfm-static",
        );
        S3ConfigBuilder::new()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(config.region.to_string()))
    };

    builder = builder.timeout_config(timeouts(config));

    if let Some(endpoint_url) = config.endpoint_url {
        builder = builder.endpoint_url(endpoint_url);
    }

    if config.force_path_style {
        builder = builder.force_path_style(true);
    }

    Client::from_conf(builder.build())
}
