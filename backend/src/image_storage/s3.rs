//! S3-backed object store

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::{presigning::PresigningConfig, Client as S3Client};
use chrono::{DateTime, Utc};
use tracing::debug;

use super::{ListingEntry, ObjectStore, PresignMethod, StoreError, StoreResult};

/// Object store backed by a single S3 bucket
pub struct S3ObjectStore {
    s3_client: Arc<S3Client>,
    bucket_name: String,
}

impl S3ObjectStore {
    /// Creates a new S3 object store
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - Bucket holding the images
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, bucket_name: String) -> Self {
        Self {
            s3_client,
            bucket_name,
        }
    }

    /// Name of the bucket this store signs against
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }
}

fn to_chrono(timestamp: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_objects(&self, prefix: &str, page_size: i32) -> StoreResult<Vec<ListingEntry>> {
        let mut pages = self
            .s3_client
            .list_objects_v2()
            .bucket(&self.bucket_name)
            .prefix(prefix)
            .max_keys(page_size)
            .into_paginator()
            .send();

        let mut entries = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page?;
            entries.extend(page.contents().iter().filter_map(|object| {
                object.key().map(|key| {
                    ListingEntry::new(key, object.last_modified().and_then(to_chrono))
                })
            }));
        }

        debug!(
            bucket = %self.bucket_name,
            prefix,
            count = entries.len(),
            "Enumerated objects"
        );

        Ok(entries)
    }

    async fn presign(
        &self,
        method: PresignMethod,
        key: &str,
        content_type: Option<&str>,
        ttl: Duration,
    ) -> StoreResult<String> {
        let presigned_config = PresigningConfig::expires_in(ttl).map_err(|e| {
            StoreError::ConfigError(format!("Failed to create presigning config: {e}"))
        })?;

        let presigned_request = match method {
            PresignMethod::Put => self
                .s3_client
                .put_object()
                .bucket(&self.bucket_name)
                .key(key)
                .set_content_type(content_type.map(ToString::to_string))
                .presigned(presigned_config)
                .await
                .map_err(StoreError::from)?,
            PresignMethod::Get => self
                .s3_client
                .get_object()
                .bucket(&self.bucket_name)
                .key(key)
                .presigned(presigned_config)
                .await
                .map_err(StoreError::from)?,
        };

        debug!(%method, key, ttl_secs = ttl.as_secs(), "Generated presigned URL");

        Ok(presigned_request.uri().to_string())
    }
}
