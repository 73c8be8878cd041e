//! In-memory object store for tests

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::{ListingEntry, ObjectStore, PresignMethod, StoreError, StoreResult};

/// Base URL of the URLs handed out by [`InMemoryObjectStore`]
pub const FAKE_STORE_URL: &str = "https://fake-store.local/gallery";

/// A single recorded `presign` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignCall {
    /// Method the URL was scoped to
    pub method: PresignMethod,
    /// Object key that was signed
    pub key: String,
    /// Content type bound into the signature, if any
    pub content_type: Option<String>,
    /// Validity window requested by the caller
    pub ttl: Duration,
}

#[derive(Debug, Default)]
struct Inner {
    objects: Vec<ListingEntry>,
    presign_calls: Vec<PresignCall>,
    list_calls: usize,
    fail_listing: Option<String>,
    fail_signing_key: Option<String>,
    fail_all_signing: bool,
}

/// Object store holding listing entries in memory and recording every
/// signing request, with switches to inject failures.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    inner: Mutex<Inner>,
}

impl InMemoryObjectStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds an object to the store
    pub fn insert(&self, entry: ListingEntry) {
        self.lock().objects.push(entry);
    }

    /// Makes every subsequent enumeration fail with `detail`
    pub fn fail_listing(&self, detail: impl Into<String>) {
        self.lock().fail_listing = Some(detail.into());
    }

    /// Makes signing fail for one specific key
    pub fn fail_signing_for(&self, key: impl Into<String>) {
        self.lock().fail_signing_key = Some(key.into());
    }

    /// Makes every signing request fail
    pub fn fail_all_signing(&self) {
        self.lock().fail_all_signing = true;
    }

    /// Every `presign` call received so far, in order
    #[must_use]
    pub fn presign_calls(&self) -> Vec<PresignCall> {
        self.lock().presign_calls.clone()
    }

    /// Number of enumeration calls received so far
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.lock().list_calls
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn list_objects(&self, prefix: &str, _page_size: i32) -> StoreResult<Vec<ListingEntry>> {
        let mut inner = self.lock();
        inner.list_calls += 1;

        if let Some(detail) = &inner.fail_listing {
            return Err(StoreError::S3Error(detail.clone()));
        }

        Ok(inner
            .objects
            .iter()
            .filter(|entry| entry.key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn presign(
        &self,
        method: PresignMethod,
        key: &str,
        content_type: Option<&str>,
        ttl: Duration,
    ) -> StoreResult<String> {
        let mut inner = self.lock();
        inner.presign_calls.push(PresignCall {
            method,
            key: key.to_string(),
            content_type: content_type.map(ToString::to_string),
            ttl,
        });

        if inner.fail_all_signing || inner.fail_signing_key.as_deref() == Some(key) {
            return Err(StoreError::ConfigError("signing credentials unavailable".to_string()));
        }

        Ok(format!(
            "{FAKE_STORE_URL}/{key}?X-Method={method}&X-Expires={}",
            ttl.as_secs()
        ))
    }
}
