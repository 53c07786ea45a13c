//! Object storage backends
//!
//! Uploaded assets are handed to an [`ObjectStore`], which keeps the bytes
//! and answers with the public URL templates will point at:
//! - [`local`]: files under a directory, served by this server or a static host
//! - [`s3`]: S3-compatible bucket with public-read objects

pub mod local;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

pub use local::{LocalObjectStore, StaticFiles};
pub use s3::S3ObjectStore;

/// Store bytes, get a URL
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key` as publicly readable and return its URL
    async fn put_object(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String>;
}
