//! Common test utilities for in-process API testing with mock providers.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use imagebus_core::{
    providers::names, testing::MockProvider, Config, EngineConfig, ImageProvider,
    ResolutionOrchestrator,
};
use imagebus_server::{create_router, AppState};

/// Re-export fixtures for test convenience
pub use imagebus_core::testing::fixtures;

/// Test fixture: an in-process router over one mock per provider name.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_resolve() {
///     let fixture = TestFixture::new();
///     fixture.unsplash.set_images(fixtures::images("unsplash", 1, 3000, 2000)).await;
///
///     let response = fixture.post("/api/v1/images/resolve", json!({ "text": "rome" })).await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    pub router: Router,
    pub wikimedia: Arc<MockProvider>,
    pub unsplash: Arc<MockProvider>,
    pub pexels: Arc<MockProvider>,
    pub placeholder: Arc<MockProvider>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    pub fn new() -> Self {
        let wikimedia = Arc::new(MockProvider::new(names::WIKIMEDIA));
        let unsplash = Arc::new(MockProvider::new(names::UNSPLASH));
        let pexels = Arc::new(MockProvider::new(names::PEXELS));
        let placeholder = Arc::new(MockProvider::new(names::PLACEHOLDER).synthetic());

        let providers: Vec<Arc<dyn ImageProvider>> = vec![
            wikimedia.clone(),
            unsplash.clone(),
            pexels.clone(),
            placeholder.clone(),
        ];

        let config = Config {
            engine: EngineConfig::immediate(),
            ..Default::default()
        };
        let orchestrator = Arc::new(ResolutionOrchestrator::new(
            providers,
            config.engine.clone(),
        ));
        let state = Arc::new(AppState::new(config, orchestrator));

        Self {
            router: create_router(state),
            wikimedia,
            unsplash,
            pexels,
            placeholder,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a request with a raw JSON body (for malformed payloads).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Fetch a plain-text body.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).to_string())
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
