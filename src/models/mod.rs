//! Data models module
//!
//! View models mirroring the backend JSON payloads. None of these are owned
//! by the client; they live until the next fetch replaces them.

pub mod alert;
pub mod language;
pub mod notification;
pub mod wishlist;

// Re-export commonly used models
pub use alert::{Alert, AlertRule, Incident, AlertDashboard, Severity};
pub use language::{LanguageSetting, UpdateLanguageRequest};
pub use notification::{Notification, UnreadCount};
pub use wishlist::WishlistItem;
