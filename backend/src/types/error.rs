//! Gateway error handling
//!
//! Every failure is converted into a status code and a `{"error": ...}` body
//! at the dispatch boundary. Store details are logged, and only listing
//! failures echo them back to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::image_storage::StoreError;

/// Error body returned on every failed request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error message
    pub error: String,
}

/// Errors surfaced by the gateway to HTTP callers
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The upload request body is not a valid upload request
    #[error("Invalid JSON body.")]
    InvalidJson,

    /// The request method is not OPTIONS, GET or POST
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// The store refused or failed to sign an upload URL
    #[error("Failed to generate presigned URL.")]
    Signing(#[source] StoreError),

    /// Enumerating or signing the stored images failed
    #[error("Failed to list images: {0}")]
    Listing(#[source] StoreError),
}

impl GatewayError {
    /// HTTP status code for this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Signing(_) | Self::Listing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::Signing(source) => tracing::error!(error = %source, "Upload signing failed"),
            Self::Listing(source) => tracing::error!(error = %source, "Image listing failed"),
            Self::InvalidJson | Self::MethodNotAllowed => {
                tracing::warn!("Client error: {} - {}", status.as_u16(), self);
            }
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
