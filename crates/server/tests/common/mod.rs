//! Common test utilities for E2E testing with mocks.
//!
//! Provides an in-process server with a mock search provider injected, so
//! the full HTTP surface can be exercised without external infrastructure.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use bibliofind_core::{
    testing::MockProvider, Config, DatabaseConfig, ServerConfig, SqliteKeyValueStore, SystemClock,
};
use bibliofind_server::api::create_router;
use bibliofind_server::state::AppState;

/// Re-export fixtures for test convenience
pub use bibliofind_core::testing::fixtures;

/// Test fixture for E2E testing with a mock search provider.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock provider - configure search results and errors
    pub provider: Arc<MockProvider>,
    /// Shared application state (for building extra sessions directly)
    pub state: Arc<AppState>,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default config.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a test fixture with custom configuration.
    pub fn with_config(mut config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        config.server = ServerConfig {
            host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            port: 0, // Not used for in-process testing
        };
        config.database = DatabaseConfig {
            path: db_path.clone(),
        };

        let provider = Arc::new(MockProvider::new());
        let store = Arc::new(SqliteKeyValueStore::new(&db_path).expect("Failed to open store"));

        let state = Arc::new(AppState::new(
            config,
            provider.clone(),
            store,
            Arc::new(SystemClock),
        ));
        let router = create_router(state.clone());

        Self {
            router,
            provider,
            state,
            temp_dir,
        }
    }

    /// Create a session over the API and return its id.
    pub async fn create_session(&self) -> String {
        let response = self.post("/api/v1/sessions", Value::Null).await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body["id"].as_str().expect("session id").to_string()
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let request = match body {
            Some(json) if !json.is_null() => {
                request_builder = request_builder.header("Content-Type", "application/json");
                request_builder
                    .body(Body::from(serde_json::to_string(&json).unwrap()))
                    .unwrap()
            }
            _ => request_builder.body(Body::empty()).unwrap(),
        };

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
