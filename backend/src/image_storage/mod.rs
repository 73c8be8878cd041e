//! Object store capability used by the gateway
//!
//! The gateway never talks to S3 directly. It enumerates and signs through
//! [`ObjectStore`], which has an S3 implementation for deployments and an
//! in-memory implementation for tests.

mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
mod s3;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use error::{StoreError, StoreResult};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::{InMemoryObjectStore, PresignCall};
pub use s3::S3ObjectStore;

/// HTTP method a presigned URL is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresignMethod {
    /// Upload of a new object
    Put,
    /// Retrieval of an existing object
    Get,
}

impl fmt::Display for PresignMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Put => f.write_str("PUT"),
            Self::Get => f.write_str("GET"),
        }
    }
}

/// One object as reported by the store's enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Full object key, including the prefix
    pub key: String,
    /// Last modification time; `None` when the store did not report one
    pub last_modified: Option<DateTime<Utc>>,
}

impl ListingEntry {
    /// Creates a listing entry
    #[must_use]
    pub fn new(key: impl Into<String>, last_modified: Option<DateTime<Utc>>) -> Self {
        Self {
            key: key.into(),
            last_modified,
        }
    }
}

/// Capabilities the gateway needs from an object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Enumerates every object whose key starts with `prefix`.
    ///
    /// `page_size` bounds each individual enumeration call; implementations
    /// keep paging until the prefix is exhausted.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if any enumeration call fails
    async fn list_objects(&self, prefix: &str, page_size: i32) -> StoreResult<Vec<ListingEntry>>;

    /// Produces a URL authorising exactly one `method` on `key` until `ttl`
    /// has elapsed. `content_type` is bound into PUT signatures.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the URL cannot be signed
    async fn presign(
        &self,
        method: PresignMethod,
        key: &str,
        content_type: Option<&str>,
        ttl: Duration,
    ) -> StoreResult<String>;
}
