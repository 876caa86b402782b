//! Marketplace backend client
//!
//! This service wraps the REST backend: base URL handling, bearer token
//! authentication, JSON decoding, retry with backoff for idempotent GETs,
//! and uniform error mapping.

use std::time::Duration;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;
use crate::config::{BackendConfig, RetryConfig};
use crate::services::session::SessionStore;
use crate::utils::errors::{ViewError, Result};
use crate::utils::helpers::{backoff_delay, generate_request_id};
use crate::utils::logging::log_api_error;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Authenticated HTTP client for the marketplace backend
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: SessionStore,
    retry: RetryConfig,
}

impl ApiClient {
    /// Create a new ApiClient instance
    pub fn new(backend: &BackendConfig, retry: &RetryConfig, session: SessionStore) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(backend.timeout_seconds))
            .user_agent(backend.user_agent.as_str())
            .build()
            .map_err(ViewError::Http)?;

        // A trailing slash keeps `join` from dropping the last path segment
        let mut base = backend.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)?;

        Ok(Self {
            client,
            base_url,
            session,
            retry: retry.clone(),
        })
    }

    /// Session this client authenticates with
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path (`/api/alerts/active`) against the base URL
    pub fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// GET a JSON document, retrying transient failures
    pub async fn get_json(&self, path: &str) -> Result<Value> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(path = path, attempt = attempt, max_attempts = max_attempts, "GET");

            match self.request_once(Method::GET, path, None).await {
                Ok(body) => return Ok(body.unwrap_or(Value::Null)),
                Err(e) if e.is_recoverable() && attempt < max_attempts => {
                    let backoff = backoff_delay(self.retry.initial_backoff_ms, attempt);
                    warn!(
                        path = path,
                        attempt = attempt,
                        max_attempts = max_attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Retrying GET"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    log_api_error("GET", &e, Some(path));
                    return Err(e);
                }
            }
        }
    }

    /// Send a mutation (POST/PATCH/PUT/DELETE); never retried
    ///
    /// Returns `None` when the backend answers with an empty body.
    pub async fn send_json(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Option<Value>> {
        debug!(method = %method, path = path, "Sending mutation");

        self.request_once(method.clone(), path, body)
            .await
            .map_err(|e| {
                log_api_error(method.as_str(), &e, Some(path));
                e
            })
    }

    async fn request_once(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Option<Value>> {
        let url = self.url_for(path)?;
        let mut request = self.authorized(self.client.request(method, url)).await?;
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        Self::read_body(path, response).await
    }

    /// Attach the bearer token and a request id; fails before any I/O when signed out
    async fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.session.token().await.ok_or(ViewError::Unauthenticated)?;

        Ok(builder
            .bearer_auth(token)
            .header(REQUEST_ID_HEADER, generate_request_id()))
    }

    async fn read_body(path: &str, response: Response) -> Result<Option<Value>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ViewError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| ViewError::Decode {
                resource: path.to_string(),
                reason: e.to_string(),
            })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
