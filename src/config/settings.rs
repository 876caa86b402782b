//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from an optional config file and environment variables.

use serde::{Deserialize, Serialize};

/// Environment variable shared with the storefront build that points at the backend
pub const BACKEND_URL_ENV: &str = "REACT_APP_BACKEND_URL";

/// Backend used when neither the config file nor the environment names one
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub backend: BackendConfig,
    pub retry: RetryConfig,
    pub polling: PollingConfig,
    pub data_source: DataSourceConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Backend REST service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

/// Retry policy for idempotent GET requests
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
}

/// Poll periods for the views that refresh on a timer
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollingConfig {
    pub alerts_interval_ms: u64,
    pub notifications_interval_ms: u64,
}

/// Which data source the views read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceMode {
    Live,
    Demo,
}

/// Data source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataSourceConfig {
    pub mode: DataSourceMode,
    /// Optional JSON file of `{ "<path>": <payload> }` fixtures for demo mode
    pub demo_fixtures_path: Option<String>,
}

/// Persisted client session (token + UI language)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Where the session file lives; `None` keeps the session in memory only
    pub storage_path: Option<String>,
    pub default_language: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily rolling log file; stdout only when unset
    pub file_path: Option<String>,
}

impl Settings {
    /// Load settings from defaults, an optional `config` file and the environment
    pub fn new() -> Result<Self, config::ConfigError> {
        let backend_override = std::env::var(BACKEND_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty());

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("MARKETDECK")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("backend.base_url", backend_override)?
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::ViewError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                base_url: DEFAULT_BACKEND_URL.to_string(),
                timeout_seconds: 10,
                user_agent: "Marketdeck/1.0".to_string(),
            },
            retry: RetryConfig {
                max_attempts: 3,
                initial_backoff_ms: 250,
            },
            polling: PollingConfig {
                alerts_interval_ms: 30_000,
                notifications_interval_ms: 30_000,
            },
            data_source: DataSourceConfig {
                mode: DataSourceMode::Live,
                demo_fixtures_path: None,
            },
            session: SessionConfig {
                storage_path: None,
                default_language: "ar".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
            },
        }
    }
}
