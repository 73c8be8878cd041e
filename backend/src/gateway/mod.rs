//! Signed-access gateway
//!
//! Turns upload and listing intents into presigned, time-bounded URLs
//! against the configured [`ObjectStore`].

use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    image_storage::{ListingEntry, ObjectStore, PresignMethod},
    types::GatewayError,
};

/// Prefix every image key lives under
pub const IMAGE_PREFIX: &str = "images/";

/// Validity window of every issued URL
pub const PRESIGNED_URL_TTL: Duration = Duration::from_secs(300);

/// Maximum number of images returned by a listing
pub const MAX_LISTED_IMAGES: usize = 24;

/// Extension used when the filename has no usable suffix
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Content type signed into uploads when the client sends none
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Body of an upload request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Client filename, only used to infer the key extension
    pub filename: Option<String>,
    /// Content type the upload will be sent with
    pub content_type: Option<String>,
}

impl UploadRequest {
    /// Parses a raw request body. An empty body is an empty request.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidJson` if the body is not a JSON object
    /// with optional string `filename` and `contentType` fields
    pub fn from_body(body: &[u8]) -> Result<Self, GatewayError> {
        if body.is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_slice(body).map_err(|e| {
            debug!(error = %e, "Rejecting upload request body");
            GatewayError::InvalidJson
        })
    }
}

/// Response to an upload request
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Presigned PUT URL the client uploads the image to
    pub upload_url: String,
    /// Key the image will be stored under
    pub key: String,
}

/// Response to a listing request
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageListResponse {
    /// Presigned GET URLs, most recently modified first
    pub images: Vec<String>,
}

/// Derives the key extension from a client filename.
///
/// The suffix after the last `.` is lower-cased and prefixed with a dot. A
/// missing filename, a filename without a dot, or a suffix that is empty or
/// not plain ASCII alphanumerics all yield [`DEFAULT_EXTENSION`].
#[must_use]
pub fn derive_extension(filename: Option<&str>) -> String {
    filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, suffix)| suffix)
        .filter(|suffix| !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_alphanumeric()))
        .map_or_else(
            || DEFAULT_EXTENSION.to_string(),
            |suffix| format!(".{}", suffix.to_ascii_lowercase()),
        )
}

/// Generates a fresh object key of the form `images/<32 hex chars><ext>`
#[must_use]
pub fn generate_object_key(filename: Option<&str>) -> String {
    format!(
        "{IMAGE_PREFIX}{}{}",
        Uuid::new_v4().simple(),
        derive_extension(filename)
    )
}

/// Keeps the `limit` most recently modified entries, newest first.
///
/// Directory placeholders (keys ending in `/`) are dropped. Entries without a
/// timestamp sort after every timestamped entry, and ties are broken by key
/// so the order is deterministic.
#[must_use]
pub fn select_most_recent(entries: Vec<ListingEntry>, limit: usize) -> Vec<ListingEntry> {
    let mut entries: Vec<ListingEntry> = entries
        .into_iter()
        .filter(|entry| !entry.key.ends_with('/'))
        .collect();

    // `None < Some(_)`, so reversing the timestamp puts missing ones last
    entries.sort_by(|a, b| {
        Reverse(a.last_modified)
            .cmp(&Reverse(b.last_modified))
            .then_with(|| a.key.cmp(&b.key))
    });
    entries.truncate(limit);
    entries
}

/// Issues presigned upload and retrieval URLs for the image gallery
pub struct Gateway {
    store: Arc<dyn ObjectStore>,
    list_page_size: i32,
}

impl Gateway {
    /// Creates a gateway over `store`
    ///
    /// # Arguments
    ///
    /// * `store` - Object store used for enumeration and signing
    /// * `list_page_size` - Page size for each enumeration call
    #[must_use]
    pub const fn new(store: Arc<dyn ObjectStore>, list_page_size: i32) -> Self {
        Self {
            store,
            list_page_size,
        }
    }

    /// Allocates a new image key and signs a PUT URL for it
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Signing` if the store cannot sign the URL
    #[instrument(skip(self, request))]
    pub async fn request_upload(
        &self,
        request: UploadRequest,
    ) -> Result<UploadResponse, GatewayError> {
        let key = generate_object_key(request.filename.as_deref());
        let content_type = request
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let upload_url = self
            .store
            .presign(
                PresignMethod::Put,
                &key,
                Some(&content_type),
                PRESIGNED_URL_TTL,
            )
            .await
            .map_err(GatewayError::Signing)?;

        info!(key = %key, content_type = %content_type, "Issued upload URL");

        Ok(UploadResponse { upload_url, key })
    }

    /// Signs GET URLs for the most recently modified images
    ///
    /// Any failure, including a single URL that cannot be signed, fails the
    /// whole listing.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Listing` if enumeration or any signing fails
    #[instrument(skip(self))]
    pub async fn list_recent_images(&self) -> Result<ImageListResponse, GatewayError> {
        let entries = self
            .store
            .list_objects(IMAGE_PREFIX, self.list_page_size)
            .await
            .map_err(GatewayError::Listing)?;

        let total = entries.len();
        let recent = select_most_recent(entries, MAX_LISTED_IMAGES);

        let mut images = Vec::with_capacity(recent.len());
        for entry in &recent {
            let url = self
                .store
                .presign(PresignMethod::Get, &entry.key, None, PRESIGNED_URL_TTL)
                .await
                .map_err(GatewayError::Listing)?;
            images.push(url);
        }

        info!(total, returned = images.len(), "Listed images");

        Ok(ImageListResponse { images })
    }
}
