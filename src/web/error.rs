//! API errors rendered as `{"error": "..."}` JSON bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::StoreError;
use crate::folders::CascadeReport;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    /// Keys left behind by a partial folder delete.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failed: Vec<String>,
}

/// Error returned by every handler. Status is one of 400, 404 or 500.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    failed: Vec<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            failed: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// A folder delete that stopped part-way.
    pub fn partial_cascade(report: &CascadeReport) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!(
                "Folder {} was only partially deleted: {} of {} keys failed",
                report.prefix,
                report.failed.len(),
                report.failed.len() + report.deleted.len()
            ),
            failed: report.failed_keys(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            failed: self.failed,
        };
        (self.status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidInput(msg) => ApiError::bad_request(msg),
            StoreError::NotFound(key) => ApiError::not_found(format!("File not found: {}", key)),
            other => {
                log::error!("store error: {}", other);
                ApiError::internal(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let cases = [
            (StoreError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (StoreError::NotFound("k".into()), StatusCode::NOT_FOUND),
            (StoreError::Unavailable("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (StoreError::PermissionDenied("no".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (StoreError::Unsupported("presign".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn not_found_names_the_key() {
        let err = ApiError::from(StoreError::NotFound("missing.txt".into()));
        assert_eq!(err.message(), "File not found: missing.txt");
    }
}
