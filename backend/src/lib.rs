//! Image gallery signed-access gateway
//!
//! Issues short-lived presigned URLs for uploading images to, and listing
//! images from, an S3 bucket.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Upload key derivation and freshness-ordered listing
pub mod gateway;

/// Object store capability and its S3 implementation
pub mod image_storage;

/// Response middleware
pub mod middleware;

/// HTTP routes
pub mod routes;

/// Server bootstrap
pub mod server;

/// Configuration and error types
pub mod types;
