//! Range source over plain HTTP, usually a presigned GET URL.

use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use reqwest::header::{CONTENT_RANGE, RANGE};
use reqwest::{Client, Response, StatusCode};

use crate::source::{RangeError, RangeSource};

pub struct HttpRangeSource {
    client: Client,
    url: String,
}

impl HttpRangeSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    async fn get(&self, range: String) -> Result<Response, RangeError> {
        self.client
            .get(&self.url)
            .header(RANGE, range)
            .send()
            .await
            .map_err(|e| RangeError::Unavailable(format!("range request failed: {}", e)))
    }
}

/// Total length from a `Content-Range` value such as `bytes 0-0/1234` or
/// `bytes */1234`. Returns `None` when the total is unknown (`*`).
pub fn parse_content_range_total(value: &str) -> Option<u64> {
    let total = value.rsplit('/').next()?.trim();
    if total == "*" {
        return None;
    }
    total.parse().ok()
}

fn status_error(status: StatusCode, body: String) -> RangeError {
    match status {
        StatusCode::NOT_FOUND => RangeError::NotFound(body),
        StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
            RangeError::PermissionDenied(format!("{} - {}", status, body))
        }
        _ => RangeError::Unavailable(format!("{} - {}", status, body)),
    }
}

fn content_range_total(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_content_range_total)
}

#[async_trait]
impl RangeSource for HttpRangeSource {
    /// Probe with `bytes=0-0`; the total comes from `Content-Range`.
    async fn size(&self) -> Result<u64, RangeError> {
        let response = self.get("bytes=0-0".to_string()).await?;
        let status = response.status();

        // Empty objects cannot satisfy 0-0 and answer 416 with `bytes */0`.
        if status == StatusCode::PARTIAL_CONTENT || status == StatusCode::RANGE_NOT_SATISFIABLE {
            if let Some(total) = content_range_total(&response) {
                let _ = response.bytes().await;
                debug!("size probe: {} bytes from Content-Range", total);
                return Ok(total);
            }
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, text));
        }

        // Server ignored the Range header. The body is dropped unread; only a
        // declared length can size the object.
        match response.content_length() {
            Some(length) => {
                debug!("size probe: {} bytes from Content-Length", length);
                Ok(length)
            }
            None => Err(RangeError::Unavailable(
                "size probe answered without Content-Range or Content-Length".to_string(),
            )),
        }
    }

    async fn read_range(&self, start: u64, end: u64) -> Result<Bytes, RangeError> {
        if end <= start {
            return Ok(Bytes::new());
        }
        // HTTP ranges are inclusive.
        let response = self.get(format!("bytes={}-{}", start, end - 1)).await?;
        let status = response.status();

        // A full-body answer is only usable when it is exactly the range asked
        // for; anything else is rejected before the body is read.
        if status == StatusCode::OK {
            let wanted = end - start;
            let fits = start == 0 && response.content_length().is_some_and(|len| len <= wanted);
            if !fits {
                return Err(RangeError::BadRange {
                    offset: start,
                    reason: "server ignored Range header".to_string(),
                });
            }
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, text));
        }

        response
            .bytes()
            .await
            .map_err(|e| RangeError::Unavailable(format!("failed to read range bytes: {}", e)))
    }
}
