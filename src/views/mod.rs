//! Screen-level views
//!
//! Each view owns its resource views and banner and exposes typed accessors
//! and user actions. Views never share state with one another.

pub mod alerts;
pub mod banner;
pub mod languages;
pub mod notifications;
pub mod wishlist;

pub use alerts::{AlertCenter, AlertTab};
pub use banner::{Banner, BannerKind, BannerSlot};
pub use languages::{LanguageSettings, plan_toggle, plan_set_default};
pub use notifications::NotificationCenter;
pub use wishlist::Wishlist;
