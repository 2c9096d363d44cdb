//! Error types for store operations.

use range_dl::RangeError;
use thiserror::Error;

/// Errors surfaced by the object store and the operations built on it.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Missing or malformed user input (empty filename, missing folder name).
    #[error("{0}")]
    InvalidInput(String),

    /// The key does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Network, timeout or service failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Credentials rejected or access denied.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The backend cannot perform this operation (e.g. presigning in memory).
    #[error("not supported: {0}")]
    Unsupported(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for RangeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => RangeError::NotFound(key),
            StoreError::PermissionDenied(msg) => RangeError::PermissionDenied(msg),
            other => RangeError::Unavailable(other.to_string()),
        }
    }
}

impl From<RangeError> for StoreError {
    fn from(e: RangeError) -> Self {
        match e {
            RangeError::NotFound(key) => StoreError::NotFound(key),
            RangeError::PermissionDenied(msg) => StoreError::PermissionDenied(msg),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}
