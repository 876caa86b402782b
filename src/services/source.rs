//! Data sources behind every view
//!
//! `Live` talks to the backend; `Demo` serves canned payloads keyed by API
//! path. The mode is chosen once from configuration. A live failure is always
//! reported as a failure and never answered from demo data.

use std::collections::HashMap;
use std::sync::Arc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use crate::config::{DataSourceConfig, DataSourceMode};
use crate::services::api::ApiClient;
use crate::utils::errors::{ViewError, Result};

/// Where views read from and write to
#[derive(Debug, Clone)]
pub enum DataSource {
    Live(ApiClient),
    Demo(DemoSource),
}

impl DataSource {
    /// Build the source named by configuration
    pub async fn from_config(config: &DataSourceConfig, client: ApiClient) -> Result<Self> {
        match config.mode {
            DataSourceMode::Live => Ok(DataSource::Live(client)),
            DataSourceMode::Demo => {
                let demo = match &config.demo_fixtures_path {
                    Some(path) => DemoSource::from_file(path).await?,
                    None => DemoSource::builtin(),
                };
                info!(fixtures = demo.len(), "Using demo data source");
                Ok(DataSource::Demo(demo))
            }
        }
    }

    pub fn mode(&self) -> DataSourceMode {
        match self {
            DataSource::Live(_) => DataSourceMode::Live,
            DataSource::Demo(_) => DataSourceMode::Demo,
        }
    }

    /// Fetch a JSON document by API path
    pub async fn get(&self, path: &str) -> Result<Value> {
        match self {
            DataSource::Live(client) => client.get_json(path).await,
            DataSource::Demo(demo) => demo.get(path),
        }
    }

    /// Perform a mutation; demo mode accepts every mutation without effect
    pub async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Option<Value>> {
        match self {
            DataSource::Live(client) => client.send_json(method, path, body.as_ref()).await,
            DataSource::Demo(_) => {
                debug!(method = %method, path = path, "Demo mode: mutation accepted locally");
                Ok(None)
            }
        }
    }
}

/// Canned payloads keyed by API path
#[derive(Debug, Clone, Default)]
pub struct DemoSource {
    fixtures: Arc<HashMap<String, Value>>,
}

impl DemoSource {
    pub fn new(fixtures: HashMap<String, Value>) -> Self {
        Self {
            fixtures: Arc::new(fixtures),
        }
    }

    /// Load fixtures from a JSON object of `{ "<path>": <payload> }`
    pub async fn from_file(path: &str) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await?;
        let fixtures: HashMap<String, Value> = serde_json::from_str(&contents)?;
        Ok(Self::new(fixtures))
    }

    /// Small built-in dataset so the dashboard can be shown without a backend
    pub fn builtin() -> Self {
        let mut fixtures = HashMap::new();

        fixtures.insert("/api/alerts/active".to_string(), json!({
            "alerts": [
                {
                    "id": "demo-1", "type": "payment", "title": "Payment gateway latency",
                    "message": "p95 latency above 2s", "severity": "critical",
                    "source": "finance", "created_at": "2024-03-01T09:00:00Z", "acknowledged": false
                },
                {
                    "id": "demo-2", "type": "security", "title": "Repeated failed logins",
                    "message": "40 failures from one address", "severity": "high",
                    "source": "security", "created_at": "2024-03-01T09:10:00Z", "acknowledged": false
                },
                {
                    "id": "demo-3", "type": "logistics", "title": "Courier backlog",
                    "message": "120 parcels waiting for pickup", "severity": "medium",
                    "source": "logistics", "created_at": "2024-03-01T08:30:00Z", "acknowledged": true
                }
            ]
        }));
        fixtures.insert("/api/alerts/rules".to_string(), json!({
            "rules": [
                { "id": "rule-1", "name": "Gateway latency", "condition": "p95 > 2000ms", "severity": "critical", "enabled": true }
            ]
        }));
        fixtures.insert("/api/alerts/incidents".to_string(), json!({ "incidents": [] }));
        fixtures.insert("/api/alerts/dashboard".to_string(), json!({
            "total_active": 3, "critical": 1, "acknowledged": 1, "open_incidents": 0
        }));
        fixtures.insert("/api/platform/languages".to_string(), json!({
            "languages": [
                { "code": "ar", "name": "العربية", "enabled": true, "is_default": true, "rtl": true },
                { "code": "en", "name": "English", "enabled": true, "is_default": false, "rtl": false }
            ]
        }));
        fixtures.insert("/api/notifications".to_string(), json!({ "notifications": [] }));
        fixtures.insert("/api/notifications/unread-count".to_string(), json!({ "count": 0 }));
        fixtures.insert("/api/wishlist".to_string(), json!({ "wishlist": [] }));

        Self::new(fixtures)
    }

    pub fn get(&self, path: &str) -> Result<Value> {
        self.fixtures
            .get(path)
            .cloned()
            .ok_or_else(|| ViewError::DemoDataMissing(path.to_string()))
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}
