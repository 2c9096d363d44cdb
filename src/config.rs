//! Configuration loaded from `config.toml` with environment overrides.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::transfer::DownloadVia;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upload body ceiling in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_size() -> u64 {
    100
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

impl ServerConfig {
    pub fn max_upload_bytes(&self) -> usize {
        (self.max_upload_size_mb as usize).saturating_mul(1024 * 1024)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    S3,
    Memory,
}

/// Object store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Left empty, the default AWS credential chain is used.
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: String,
    /// Custom endpoint, e.g. `http://localhost:9000` for MinIO.
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Cloudflare account id; derives the R2 endpoint when no endpoint is set.
    #[serde(default)]
    pub r2_account_id: Option<String>,
    #[serde(default)]
    pub force_path_style: bool,
    #[serde(default = "default_presign_ttl")]
    pub presign_ttl_secs: u32,
    #[serde(default)]
    pub download_via: DownloadVia,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_secs: u64,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_presign_ttl() -> u32 {
    3600
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_operation_timeout() -> u64 {
    60
}

/// SigV4 presigned URLs cannot outlive seven days.
const MAX_PRESIGN_TTL_SECS: u32 = 7 * 24 * 3600;

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            bucket: String::new(),
            region: default_region(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            endpoint_url: None,
            r2_account_id: None,
            force_path_style: false,
            presign_ttl_secs: default_presign_ttl(),
            download_via: DownloadVia::default(),
            connect_timeout_secs: default_connect_timeout(),
            operation_timeout_secs: default_operation_timeout(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default level; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional file receiving a copy of the console output.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Load from a TOML file, then apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Supported variables:
    /// - `BUCKETFM_BUCKET`
    /// - `BUCKETFM_ACCESS_KEY_ID`
    /// - `BUCKETFM_SECRET_ACCESS_KEY`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(bucket) = non_empty("BUCKETFM_BUCKET") {
            self.storage.bucket = bucket;
        }
        if let Some(key) = non_empty("BUCKETFM_ACCESS_KEY_ID") {
            self.storage.access_key_id = key;
        }
        if let Some(secret) = non_empty("BUCKETFM_SECRET_ACCESS_KEY") {
            self.storage.secret_access_key = secret;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.backend == Backend::S3 && self.storage.bucket.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.bucket is required for the s3 backend".to_string(),
            ));
        }
        if self.storage.presign_ttl_secs == 0 || self.storage.presign_ttl_secs > MAX_PRESIGN_TTL_SECS
        {
            return Err(ConfigError::Invalid(format!(
                "storage.presign_ttl_secs must be between 1 and {}",
                MAX_PRESIGN_TTL_SECS
            )));
        }
        if self.server.max_upload_size_mb == 0 {
            return Err(ConfigError::Invalid(
                "server.max_upload_size_mb must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
