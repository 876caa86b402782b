//! Error handling for Marketdeck
//!
//! This module defines the main error types used throughout the crate
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for every fetch, mutation and configuration step
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response for {resource}: {reason}")]
    Decode { resource: String, reason: String },

    #[error("Not authenticated: no session token")]
    Unauthenticated,

    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("View {0} is closed")]
    Closed(String),

    #[error("No demo data for {0}")]
    DemoDataMissing(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for Marketdeck operations
pub type Result<T> = std::result::Result<T, ViewError>;

impl ViewError {
    /// Check if the error is transient and an idempotent request may be retried
    pub fn is_recoverable(&self) -> bool {
        match self {
            ViewError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ViewError::Status { status, .. } => *status == 429 || *status >= 500,
            ViewError::Decode { .. } => false,
            ViewError::Unauthenticated => false,
            ViewError::Rejected(_) => false,
            ViewError::Config(_) => false,
            ViewError::Closed(_) => false,
            ViewError::DemoDataMissing(_) => false,
            ViewError::Serialization(_) => false,
            ViewError::Io(_) => true,
            ViewError::UrlParse(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ViewError::Config(_) => ErrorSeverity::Critical,
            ViewError::Unauthenticated => ErrorSeverity::Warning,
            ViewError::Status { status: 401 | 403, .. } => ErrorSeverity::Warning,
            ViewError::Rejected(_) => ErrorSeverity::Info,
            ViewError::Closed(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// Message suitable for a user-facing banner
    pub fn user_message(&self) -> String {
        match self {
            ViewError::Rejected(reason) => reason.clone(),
            ViewError::Unauthenticated => "Please sign in again".to_string(),
            ViewError::Status { status: 401 | 403, .. } => "Your session has expired".to_string(),
            ViewError::Status { status, .. } if *status >= 500 => {
                "The server is having trouble, please try again".to_string()
            }
            ViewError::Http(_) => "Network error, check your connection".to_string(),
            other => other.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
