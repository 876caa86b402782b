//! Transient status banner
//!
//! The one place views report the outcome of user actions. A banner expires
//! after its time-to-live; the next banner replaces the current one.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use crate::utils::errors::ViewError;

/// How long a banner stays visible by default
pub const DEFAULT_BANNER_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    pub shown_at: Instant,
}

#[derive(Debug, Clone)]
pub struct BannerSlot {
    tx: Arc<watch::Sender<Option<Banner>>>,
    ttl: Duration,
}

impl BannerSlot {
    pub fn new(ttl: Duration) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            tx: Arc::new(tx),
            ttl,
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(BannerKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(BannerKind::Error, message.into());
    }

    /// Show the user-facing message of `error`
    pub fn from_error(&self, error: &ViewError) {
        self.show(BannerKind::Error, error.user_message());
    }

    fn show(&self, kind: BannerKind, message: String) {
        self.tx.send_replace(Some(Banner {
            kind,
            message,
            shown_at: Instant::now(),
        }));
    }

    /// Banner still within its time-to-live
    pub fn current(&self) -> Option<Banner> {
        self.tx
            .borrow()
            .as_ref()
            .filter(|banner| banner.shown_at.elapsed() < self.ttl)
            .cloned()
    }

    pub fn clear(&self) {
        self.tx.send_replace(None);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Banner>> {
        self.tx.subscribe()
    }
}

impl Default for BannerSlot {
    fn default() -> Self {
        Self::new(DEFAULT_BANNER_TTL)
    }
}
