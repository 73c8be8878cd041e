use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response, Extension, Router};
use gallery_backend::{gateway::Gateway, image_storage::InMemoryObjectStore, routes};
use tower::ServiceExt;

/// Setup tracing for tests
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();
}

/// Router wired to an in-memory object store
pub struct TestSetup {
    pub router: Router,
    pub store: Arc<InMemoryObjectStore>,
}

impl TestSetup {
    pub fn new() -> Self {
        Self::with_store(InMemoryObjectStore::new())
    }

    pub fn with_store(store: InMemoryObjectStore) -> Self {
        setup_test_env();

        let store = Arc::new(store);
        let gateway = Arc::new(Gateway::new(store.clone(), 1000));

        let router = routes::handler().layer(Extension(gateway));

        Self { router, store }
    }

    pub async fn send_request(
        &self,
        method: &str,
        route: &str,
        body: impl Into<Body>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method(method)
            .header("Content-Type", "application/json")
            .body(body.into())?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_post_request(
        &self,
        payload: serde_json::Value,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_request("POST", "/", payload.to_string()).await
    }

    pub async fn send_get_request(&self) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_request("GET", "/", Body::empty()).await
    }
}
