use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;

/// Read the raw response body
pub async fn response_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    serde_json::from_slice(&response_bytes(response).await).unwrap()
}

/// Timestamp `secs` seconds after the epoch
pub fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

/// Assert that `key` is `images/<32 lowercase hex chars><extension>`
pub fn assert_image_key(key: &str, extension: &str) {
    let token = key
        .strip_prefix("images/")
        .and_then(|rest| rest.strip_suffix(extension))
        .unwrap_or_else(|| panic!("unexpected key shape: {key}"));

    assert_eq!(token.len(), 32, "token length in {key}");
    assert!(
        token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)),
        "token is not lowercase hex: {key}"
    );
}

/// Assert that the fixed CORS headers are present
pub fn assert_cors_headers(response: &Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-headers"], "content-type");
    assert_eq!(headers["access-control-allow-methods"], "GET,POST,OPTIONS");
}
