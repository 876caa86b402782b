//! Marketdeck
//!
//! Remote resource views for the marketplace storefront and the command
//! center dashboard. This library provides the fetch / poll / optimistic
//! update lifecycle once, plus the screens built on it: alerts, language
//! settings, notifications and the wishlist.

pub mod config;
pub mod services;
pub mod models;
pub mod state;
pub mod views;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ViewError, Result};

// Re-export main components for easy access
pub use services::{ApiClient, DataSource, ServiceFactory, SessionStore};
pub use state::{ResourceView, ResourceSpec, ResourceState, OptimisticCommand, TabSelector};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
