mod common;

use common::*;

use gallery_backend::{image_storage::ListingEntry, routes::gallery::MAX_UPLOAD_BODY_BYTES};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_options_preflight_is_empty_204() {
    let setup = TestSetup::new();

    let response = setup
        .send_request("OPTIONS", "/", "")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_cors_headers(&response);
    assert!(response_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_options_ignores_body() {
    let setup = TestSetup::new();

    for body in ["not-json", r#"{"filename":"cat.png"}"#] {
        let response = setup
            .send_request("OPTIONS", "/", body)
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response_bytes(response).await.is_empty());
    }

    assert!(setup.store.presign_calls().is_empty());
    assert_eq!(setup.store.list_calls(), 0);
}

#[tokio::test]
async fn test_unsupported_methods_are_405() {
    let setup = TestSetup::new();

    for method in ["PUT", "DELETE", "PATCH", "HEAD", "TRACE"] {
        let response = setup
            .send_request(method, "/", "")
            .await
            .expect("Failed to send request");

        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "Failed for method: {method}"
        );
        assert_cors_headers(&response);

        if method != "HEAD" {
            let body = parse_response_body(response).await;
            assert_eq!(body, json!({ "error": "Method Not Allowed" }));
        }
    }

    assert!(setup.store.presign_calls().is_empty());
    assert_eq!(setup.store.list_calls(), 0);
}

#[tokio::test]
async fn test_dispatch_ignores_path() {
    let setup = TestSetup::new();

    for route in ["/", "/images", "/any/nested/path?x=1"] {
        let response = setup
            .send_request("GET", route, "")
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), StatusCode::OK, "Failed for route: {route}");
        let body = parse_response_body(response).await;
        assert_eq!(body, json!({ "images": [] }));
    }
}

/// Larger than axum's default 2 MiB extractor limit
const OVERSIZED_BODY_BYTES: usize = 3 * 1024 * 1024;

#[tokio::test]
async fn test_options_with_oversized_body_is_empty_204() {
    let setup = TestSetup::new();

    let response = setup
        .send_request("OPTIONS", "/", vec![b'x'; OVERSIZED_BODY_BYTES])
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_cors_headers(&response);
    assert!(response_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_get_with_oversized_body_still_lists() {
    let setup = TestSetup::new();
    setup
        .store
        .insert(ListingEntry::new("images/cat.jpg", timestamp(1_700_000_000)));

    let response = setup
        .send_request("GET", "/", vec![b'x'; OVERSIZED_BODY_BYTES])
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(&response);
    let body = parse_response_body(response).await;
    assert_eq!(body["images"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_post_with_oversized_body_is_invalid_json() {
    let setup = TestSetup::new();

    let response = setup
        .send_request("POST", "/", vec![b'x'; OVERSIZED_BODY_BYTES])
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_cors_headers(&response);
    let body = parse_response_body(response).await;
    assert_eq!(body, json!({ "error": "Invalid JSON body." }));
    assert!(setup.store.presign_calls().is_empty());
}

#[tokio::test]
async fn test_post_over_upload_limit_is_rejected_even_if_valid_json() {
    let setup = TestSetup::new();
    let filename = format!("{}.png", "a".repeat(MAX_UPLOAD_BODY_BYTES));

    let response = setup
        .send_post_request(json!({ "filename": filename }))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body, json!({ "error": "Invalid JSON body." }));
    assert!(setup.store.presign_calls().is_empty());
}
