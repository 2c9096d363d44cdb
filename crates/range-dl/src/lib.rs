//! Bounded-memory download engine.
//!
//! An object is pulled through sequential half-open range reads of at most
//! [`CHUNK_SIZE`] bytes, so peak memory stays at one chunk no matter how large
//! the object is. The size is fixed before the first chunk is read, which lets
//! callers declare `Content-Length` up front.
//!
//! - `source`: the [`RangeSource`] trait and its error type
//! - `session`: the per-download state machine and chunk stream
//! - `http`: a source reading a (presigned) URL with `Range:` requests

mod http;
mod session;
mod source;

pub use http::{parse_content_range_total, HttpRangeSource};
pub use session::{start_download, Download, TransferSession, TransferState};
pub use source::{RangeError, RangeSource};

/// Upper bound for a single range read (4 MiB).
pub const CHUNK_SIZE: u64 = 4 * 1024 * 1024;
