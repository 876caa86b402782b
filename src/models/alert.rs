//! Alert models for the command center

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::utils::helpers::deserialize_id;

/// Alert severity as reported by the backend
///
/// Unknown severities are read as `Low` so a new backend level never
/// breaks the whole alert list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Critical,
    High,
    Warning,
    Medium,
    Low,
}

impl Severity {
    /// Sort rank, most urgent first
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Warning => 2,
            Severity::Medium => 3,
            Severity::Low => 4,
        }
    }

    /// Badge color used by the dashboard
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Critical => "red",
            Severity::High => "orange",
            Severity::Warning => "yellow",
            Severity::Medium => "blue",
            Severity::Low => "gray",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Critical => "🚨",
            Severity::High => "⚠️",
            Severity::Warning => "⚡",
            Severity::Medium => "ℹ️",
            Severity::Low => "📋",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Warning => "warning",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "warning" => Severity::Warning,
            "medium" => Severity::Medium,
            _ => Severity::Low,
        }
    }
}

impl From<Severity> for String {
    fn from(value: Severity) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub alert_type: String,
    pub title: String,
    #[serde(default)]
    pub message: String,
    pub severity: Severity,
    #[serde(default)]
    pub source: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub acknowledged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub condition: String,
    pub severity: Severity,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    pub severity: Severity,
    #[serde(default)]
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Summary counters behind `/api/alerts/dashboard`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertDashboard {
    #[serde(default)]
    pub total_active: u64,
    #[serde(default)]
    pub critical: u64,
    #[serde(default)]
    pub acknowledged: u64,
    #[serde(default)]
    pub open_incidents: u64,
}
