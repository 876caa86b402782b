//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the crate.

use std::time::Duration;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Generate a correlation id for an outgoing request
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Format a timestamp relative to `now` ("5 minutes ago")
pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(timestamp);

    if diff < chrono::Duration::minutes(1) {
        "just now".to_string()
    } else if diff < chrono::Duration::hours(1) {
        format!("{} minutes ago", diff.num_minutes())
    } else if diff < chrono::Duration::days(1) {
        format!("{} hours ago", diff.num_hours())
    } else if diff < chrono::Duration::weeks(1) {
        format!("{} days ago", diff.num_days())
    } else {
        format_timestamp(timestamp)
    }
}

/// Build an API path from a prefix and an opaque id, percent-encoding the id
pub fn resource_path(prefix: &str, id: &str, suffix: Option<&str>) -> String {
    let base = format!("{}/{}", prefix.trim_end_matches('/'), urlencoding::encode(id));
    match suffix {
        Some(suffix) => format!("{}/{}", base, suffix.trim_start_matches('/')),
        None => base,
    }
}

/// Exponential backoff for `attempt` (1-based) with up to 20% jitter
pub fn backoff_delay(initial_backoff_ms: u64, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    let base = initial_backoff_ms.saturating_mul(1u64 << exponent);
    let jitter = if base >= 5 {
        rand::thread_rng().gen_range(0..=base / 5)
    } else {
        0
    };
    Duration::from_millis(base + jitter)
}

/// Accept ids the backend sends either as strings or as numbers
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}
