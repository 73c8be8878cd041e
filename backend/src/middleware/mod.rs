/// CORS response headers
pub mod cors;

pub use cors::apply_cors_headers;
