//! Per-download transfer session.

use bytes::Bytes;
use futures_util::stream::{self, BoxStream, StreamExt};
use log::{debug, error, info, warn};
use std::fmt;

use crate::source::{RangeError, RangeSource};
use crate::CHUNK_SIZE;

/// Lifecycle of a single transfer. There are no transitions back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    Initiated,
    Sizing,
    Streaming { offset: u64 },
    Completed,
    Aborted,
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferState::Initiated => write!(f, "initiated"),
            TransferState::Sizing => write!(f, "sizing"),
            TransferState::Streaming { offset } => write!(f, "streaming@{}", offset),
            TransferState::Completed => write!(f, "completed"),
            TransferState::Aborted => write!(f, "aborted"),
        }
    }
}

/// One download: `{key, total_size, cursor}` plus the source it reads from.
///
/// Owned by the request that created it. It is moved into the chunk stream,
/// so dropping the stream (client went away) drops the session and no further
/// reads are issued.
pub struct TransferSession<S> {
    key: String,
    source: S,
    chunk_size: u64,
    total_size: u64,
    state: TransferState,
}

impl<S: RangeSource> TransferSession<S> {
    pub fn new(key: impl Into<String>, source: S) -> Self {
        Self {
            key: key.into(),
            source,
            chunk_size: CHUNK_SIZE,
            total_size: 0,
            state: TransferState::Initiated,
        }
    }

    /// Override the chunk size. Zero is treated as one byte.
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Bytes delivered so far.
    pub fn cursor(&self) -> u64 {
        match self.state {
            TransferState::Streaming { offset } => offset,
            TransferState::Completed => self.total_size,
            _ => 0,
        }
    }

    /// Metadata-only size query. Moves `Initiated -> Sizing -> Streaming{0}`.
    pub async fn size(&mut self) -> Result<u64, RangeError> {
        if self.state != TransferState::Initiated {
            return Ok(self.total_size);
        }
        self.state = TransferState::Sizing;
        match self.source.size().await {
            Ok(total) => {
                self.total_size = total;
                self.state = TransferState::Streaming { offset: 0 };
                debug!("transfer {}: sized at {} bytes", self.key, total);
                Ok(total)
            }
            Err(e) => {
                self.state = TransferState::Aborted;
                Err(e)
            }
        }
    }

    /// Fetch the next chunk, or `None` once the whole object was delivered.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>, RangeError> {
        if self.state == TransferState::Initiated {
            self.size().await?;
        }
        let offset = match self.state {
            TransferState::Streaming { offset } => offset,
            TransferState::Completed => return Ok(None),
            _ => return Err(RangeError::Finished),
        };

        if offset >= self.total_size {
            self.complete();
            return Ok(None);
        }

        let wanted = self.chunk_size.min(self.total_size - offset);
        let chunk = match self.source.read_range(offset, offset + wanted).await {
            Ok(chunk) => chunk,
            Err(e) => {
                self.abort(&e);
                return Err(e);
            }
        };

        let got = chunk.len() as u64;
        if got == 0 || got > wanted {
            let err = RangeError::BadRange {
                offset,
                reason: format!("requested {} bytes, got {}", wanted, got),
            };
            self.abort(&err);
            return Err(err);
        }

        let next = offset + got;
        self.state = TransferState::Streaming { offset: next };
        if next == self.total_size {
            self.complete();
        }
        Ok(Some(chunk))
    }

    /// Turn the session into a lazy, non-restartable stream of chunks.
    pub fn into_stream(self) -> BoxStream<'static, Result<Bytes, RangeError>>
    where
        S: 'static,
    {
        stream::try_unfold(self, |mut session| async move {
            Ok(session.next_chunk().await?.map(|chunk| (chunk, session)))
        })
        .boxed()
    }

    fn complete(&mut self) {
        self.state = TransferState::Completed;
        info!("transfer {}: completed ({} bytes)", self.key, self.total_size);
    }

    fn abort(&mut self, err: &RangeError) {
        error!(
            "transfer {}: aborted at {}/{}: {}",
            self.key,
            self.cursor(),
            self.total_size,
            err
        );
        self.state = TransferState::Aborted;
    }
}

impl<S> Drop for TransferSession<S> {
    fn drop(&mut self) {
        if let TransferState::Streaming { offset } = self.state {
            warn!(
                "transfer {}: dropped at {}/{}, output closed",
                self.key, offset, self.total_size
            );
        }
    }
}

/// A sized download, ready to stream.
pub struct Download {
    pub key: String,
    pub total_size: u64,
    pub chunks: BoxStream<'static, Result<Bytes, RangeError>>,
}

/// Size the object and hand back `(total_size, chunk stream)`.
///
/// Nothing but the size query has run when this returns, so a missing object
/// fails here, before any response framing is committed.
pub async fn start_download<S>(
    key: impl Into<String>,
    source: S,
    chunk_size: u64,
) -> Result<Download, RangeError>
where
    S: RangeSource + 'static,
{
    let mut session = TransferSession::new(key, source).with_chunk_size(chunk_size);
    let total_size = session.size().await?;
    let key = session.key().to_string();
    Ok(Download {
        key,
        total_size,
        chunks: session.into_stream(),
    })
}
