//! Object store backends.
//!
//! - `aws`: S3-compatible buckets through the AWS SDK (S3, R2, MinIO)
//! - `memory`: in-process store for local runs and tests

pub mod aws;
pub mod memory;
pub mod s3_client;

pub use aws::AwsStore;
pub use memory::MemoryStore;
