/// Gallery method dispatch
pub mod gallery;

use axum::{extract::DefaultBodyLimit, middleware, Router};

use crate::middleware::apply_cors_headers;

/// Creates the router. There is no path routing: every request reaches the
/// method dispatcher.
pub fn handler() -> Router {
    Router::new()
        .fallback(gallery::dispatch)
        .layer(DefaultBodyLimit::max(gallery::MAX_UPLOAD_BODY_BYTES))
        .layer(middleware::map_response(apply_cors_headers))
}
