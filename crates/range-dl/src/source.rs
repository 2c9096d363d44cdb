use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Errors raised while sizing or reading an object.
#[derive(Debug, Error)]
pub enum RangeError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The source answered, but not with the bytes that were asked for.
    #[error("bad range response at offset {offset}: {reason}")]
    BadRange { offset: u64, reason: String },

    #[error("transfer already finished")]
    Finished,
}

/// Anything that can report its total size and serve `[start, end)` slices.
#[async_trait]
pub trait RangeSource: Send + Sync {
    /// Total size in bytes, without fetching the body.
    async fn size(&self) -> Result<u64, RangeError>;

    /// Read the half-open byte range `[start, end)`.
    async fn read_range(&self, start: u64, end: u64) -> Result<Bytes, RangeError>;
}

#[async_trait]
impl<S: RangeSource + ?Sized> RangeSource for std::sync::Arc<S> {
    async fn size(&self) -> Result<u64, RangeError> {
        (**self).size().await
    }

    async fn read_range(&self, start: u64, end: u64) -> Result<Bytes, RangeError> {
        (**self).read_range(start, end).await
    }
}

#[async_trait]
impl<S: RangeSource + ?Sized> RangeSource for Box<S> {
    async fn size(&self) -> Result<u64, RangeError> {
        (**self).size().await
    }

    async fn read_range(&self, start: u64, end: u64) -> Result<Bytes, RangeError> {
        (**self).read_range(start, end).await
    }
}
