//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use std::sync::OnceLock;
use regex::Regex;
use crate::utils::errors::{ViewError, Result};
use super::{Settings, DataSourceMode};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_backend_config(&settings.backend)?;
    validate_retry_config(&settings.retry)?;
    validate_polling_config(&settings.polling)?;
    validate_data_source_config(&settings.data_source)?;
    validate_session_config(&settings.session)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate backend configuration
fn validate_backend_config(config: &super::BackendConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(ViewError::Config(
            "Backend URL is required".to_string()
        ));
    }

    let parsed = url::Url::parse(&config.base_url)?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ViewError::Config(
            format!("Backend URL must use http or https, got {}", parsed.scheme())
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(ViewError::Config(
            "Backend timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate retry configuration
fn validate_retry_config(config: &super::RetryConfig) -> Result<()> {
    if config.max_attempts == 0 {
        return Err(ViewError::Config(
            "Retry max attempts must be at least 1".to_string()
        ));
    }

    Ok(())
}

/// Validate polling configuration
fn validate_polling_config(config: &super::PollingConfig) -> Result<()> {
    if config.alerts_interval_ms == 0 || config.notifications_interval_ms == 0 {
        return Err(ViewError::Config(
            "Poll intervals must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate data source configuration
fn validate_data_source_config(config: &super::DataSourceConfig) -> Result<()> {
    if config.mode == DataSourceMode::Live && config.demo_fixtures_path.is_some() {
        tracing::warn!("demo_fixtures_path is set but data source mode is live; fixtures are ignored");
    }

    Ok(())
}

/// Validate session configuration
fn validate_session_config(config: &super::SessionConfig) -> Result<()> {
    if !is_language_code(&config.default_language) {
        return Err(ViewError::Config(
            format!("Invalid default language code: {}", config.default_language)
        ));
    }

    if let Some(path) = &config.storage_path {
        if path.trim().is_empty() {
            return Err(ViewError::Config(
                "Session storage path cannot be blank".to_string()
            ));
        }
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(ViewError::Config(
            "Log level is required".to_string()
        ));
    }

    tracing_subscriber::EnvFilter::try_new(&config.level).map_err(|e| {
        ViewError::Config(format!("Invalid log filter '{}': {}", config.level, e))
    })?;

    Ok(())
}

/// Check that a string looks like a locale code (`en`, `ar`, `pt-BR`)
pub fn is_language_code(code: &str) -> bool {
    static LANGUAGE_CODE: OnceLock<Option<Regex>> = OnceLock::new();

    LANGUAGE_CODE
        .get_or_init(|| Regex::new(r"^[a-z]{2,3}(-[A-Z]{2})?$").ok())
        .as_ref()
        .map(|re| re.is_match(code))
        .unwrap_or(false)
}
