//! Mock marketplace backend for testing
//!
//! Wraps a wiremock server with helpers for the endpoints the views talk to.
//! Every mock requires the test bearer token unless stated otherwise.

use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

pub const TEST_TOKEN: &str = "test-token";

/// Mock backend server for testing
pub struct BackendMockServer {
    pub server: MockServer,
}

/// Configuration for mock responses
#[derive(Debug, Clone)]
pub struct MockResponseConfig {
    pub status: u16,
    pub delay_ms: Option<u64>,
    pub custom_response: Option<Value>,
}

impl Default for MockResponseConfig {
    fn default() -> Self {
        Self {
            status: 200,
            delay_ms: None,
            custom_response: None,
        }
    }
}

impl MockResponseConfig {
    pub fn ok(body: Value) -> Self {
        Self {
            custom_response: Some(body),
            ..Default::default()
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn delayed(mut self, delay_ms: u64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    fn template(&self) -> ResponseTemplate {
        let body = self.custom_response.clone().unwrap_or_else(|| {
            if self.status < 400 {
                json!({ "success": true })
            } else {
                json!({ "detail": format!("mock error {}", self.status) })
            }
        });

        let mut template = ResponseTemplate::new(self.status).set_body_json(body);
        if let Some(delay) = self.delay_ms {
            template = template.set_delay(std::time::Duration::from_millis(delay));
        }
        template
    }
}

fn bearer() -> String {
    format!("Bearer {}", TEST_TOKEN)
}

impl BackendMockServer {
    /// Create a new mock backend
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Authenticated GET returning the configured response
    pub async fn mock_get(&self, endpoint: &str, config: MockResponseConfig) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .and(header("Authorization", bearer().as_str()))
            .respond_with(config.template())
            .mount(&self.server)
            .await;
    }

    /// Authenticated GET answering with `config` for the first `times` calls only
    pub async fn mock_get_times(&self, endpoint: &str, config: MockResponseConfig, times: u64) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .and(header("Authorization", bearer().as_str()))
            .respond_with(config.template())
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
    }

    /// Authenticated mutation (POST, PATCH, DELETE)
    pub async fn mock_mutation(&self, verb: &str, endpoint: &str, config: MockResponseConfig) {
        Mock::given(method(verb))
            .and(path(endpoint))
            .and(header("Authorization", bearer().as_str()))
            .respond_with(config.template())
            .mount(&self.server)
            .await;
    }

    /// Authenticated mutation that must carry exactly `expected` as its body
    pub async fn mock_mutation_with_body(&self, verb: &str, endpoint: &str, expected: Value, config: MockResponseConfig) {
        Mock::given(method(verb))
            .and(path(endpoint))
            .and(header("Authorization", bearer().as_str()))
            .and(body_json(expected))
            .respond_with(config.template())
            .mount(&self.server)
            .await;
    }

    /// Setup the read endpoints with the default fixtures
    pub async fn setup_default_mocks(&self) {
        self.mock_get("/api/alerts/active", MockResponseConfig::ok(alerts_body(&super::sample_alerts()))).await;
        self.mock_get("/api/alerts/rules", MockResponseConfig::ok(json!({ "rules": super::sample_rules() }))).await;
        self.mock_get("/api/alerts/incidents", MockResponseConfig::ok(json!({ "incidents": [] }))).await;
        self.mock_get("/api/alerts/dashboard", MockResponseConfig::ok(super::sample_dashboard())).await;
        self.mock_get("/api/platform/languages", MockResponseConfig::ok(json!({ "languages": super::sample_languages() }))).await;
        self.mock_get("/api/notifications/unread-count", MockResponseConfig::ok(json!({ "count": 2 }))).await;
        self.mock_get("/api/notifications", MockResponseConfig::ok(json!({ "notifications": super::sample_notifications() }))).await;
        self.mock_get("/api/wishlist", MockResponseConfig::ok(json!({ "wishlist": super::sample_wishlist() }))).await;
    }

    /// Reset all mocks
    pub async fn reset(&self) {
        self.server.reset().await;
    }

    /// All requests the server received for a method and path
    pub async fn requests_to(&self, verb: &str, endpoint: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.method.as_str() == verb && request.url.path() == endpoint)
            .collect()
    }

    /// Verify that an endpoint was hit a specific number of times
    pub async fn verify_endpoint_called(&self, verb: &str, endpoint: &str, times: usize) {
        let count = self.requests_to(verb, endpoint).await.len();
        assert_eq!(
            count, times,
            "Expected {} {} to be called {} times, but was called {} times",
            verb, endpoint, times, count
        );
    }
}

pub fn alerts_body(alerts: &Value) -> Value {
    json!({ "alerts": alerts })
}
