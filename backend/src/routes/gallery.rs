use std::sync::Arc;

use axum::{
    body::to_bytes,
    extract::Request,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json, RequestExt,
};
use tracing::{debug, instrument};

use crate::{
    gateway::{Gateway, ImageListResponse, UploadRequest, UploadResponse},
    types::GatewayError,
};

/// Largest upload request body that is read. Anything bigger is rejected as
/// invalid input.
pub const MAX_UPLOAD_BODY_BYTES: usize = 64 * 1024;

/// Routes a request by method alone
///
/// - `OPTIONS` answers browser preflight with an empty 204; the body is never read
/// - `POST` issues an upload URL for a new image key
/// - `GET` lists the most recent images as retrieval URLs
/// - anything else is rejected with 405
#[instrument(skip(gateway, request), fields(method = %request.method()))]
pub async fn dispatch(Extension(gateway): Extension<Arc<Gateway>>, request: Request) -> Response {
    let method = request.method().clone();
    match method {
        Method::OPTIONS => StatusCode::NO_CONTENT.into_response(),
        Method::POST => create_upload_url(&gateway, request).await.into_response(),
        Method::GET => list_images(&gateway).await.into_response(),
        _ => GatewayError::MethodNotAllowed.into_response(),
    }
}

async fn create_upload_url(
    gateway: &Gateway,
    request: Request,
) -> Result<Json<UploadResponse>, GatewayError> {
    // Bounded by the router's `DefaultBodyLimit`
    let body = to_bytes(request.into_limited_body(), usize::MAX)
        .await
        .map_err(|e| {
            debug!(error = %e, "Failed to read upload request body");
            GatewayError::InvalidJson
        })?;

    let request = UploadRequest::from_body(&body)?;
    Ok(Json(gateway.request_upload(request).await?))
}

async fn list_images(gateway: &Gateway) -> Result<Json<ImageListResponse>, GatewayError> {
    Ok(Json(gateway.list_recent_images().await?))
}
