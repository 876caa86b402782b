//! Notification bell and list
//!
//! The unread badge polls on its own interval; the full list is fetched only
//! when opened. Read and delete actions are optimistic.

use std::time::Duration;
use reqwest::Method;
use tracing::warn;
use crate::models::{Notification, UnreadCount};
use crate::services::source::DataSource;
use crate::state::optimistic::{remove_where, update_where, MutationOutcome, OptimisticCommand};
use crate::state::resource::{FetchOutcome, ResourceSpec, ResourceView};
use crate::utils::errors::Result;
use crate::utils::helpers::resource_path;
use crate::views::banner::BannerSlot;

const NOTIFICATIONS_PATH: &str = "/api/notifications";
const UNREAD_RESOURCE: &str = "unread";
const LIST_RESOURCE: &str = "notifications";

#[derive(Debug)]
pub struct NotificationCenter {
    badge: ResourceView,
    list: ResourceView,
    banner: BannerSlot,
    poll_interval: Duration,
}

impl NotificationCenter {
    pub fn new(source: DataSource, poll_interval: Duration) -> Self {
        let badge = ResourceView::new(
            "notifications.badge",
            source.clone(),
            vec![ResourceSpec::raw(UNREAD_RESOURCE, "/api/notifications/unread-count")],
        );
        let list = ResourceView::new(
            "notifications.list",
            source,
            vec![ResourceSpec::enveloped(LIST_RESOURCE, NOTIFICATIONS_PATH, "notifications")],
        );

        Self {
            badge,
            list,
            banner: BannerSlot::default(),
            poll_interval,
        }
    }

    /// Load the unread count and keep polling it
    pub async fn mount(&self) -> Result<FetchOutcome> {
        self.badge.start_polling(self.poll_interval);
        self.badge.refresh().await
    }

    /// Fetch the full list (opening the dropdown)
    pub async fn open_list(&self) -> Result<FetchOutcome> {
        self.list.refresh().await.map_err(|e| {
            self.banner.from_error(&e);
            e
        })
    }

    pub fn badge_view(&self) -> &ResourceView {
        &self.badge
    }

    pub fn list_view(&self) -> &ResourceView {
        &self.list
    }

    pub fn banner(&self) -> &BannerSlot {
        &self.banner
    }

    pub fn unread_count(&self) -> Result<u64> {
        Ok(self
            .badge
            .state()
            .get::<UnreadCount>(UNREAD_RESOURCE)?
            .map(|unread| unread.count)
            .unwrap_or(0))
    }

    pub fn notifications(&self) -> Result<Vec<Notification>> {
        self.list.state().items(LIST_RESOURCE)
    }

    pub async fn mark_read(&self, notification_id: &str) -> Result<MutationOutcome> {
        let path = resource_path(NOTIFICATIONS_PATH, notification_id, Some("read"));
        let target = format!("notification {}", notification_id);
        let source = self.list.source();

        let result = OptimisticCommand::<Notification>::new(&self.list, LIST_RESOURCE, "mark_read", &target)
            .run(
                |items| update_where(items, |n| n.id == notification_id, |n| n.read = true),
                || source.send(Method::POST, &path, None),
            )
            .await;

        self.after_mutation(&result).await;
        result
    }

    pub async fn mark_all_read(&self) -> Result<MutationOutcome> {
        if self.notifications()?.iter().all(|n| n.read) {
            return Ok(MutationOutcome { applied: 0 });
        }

        let path = format!("{}/read-all", NOTIFICATIONS_PATH);
        let source = self.list.source();

        let result = OptimisticCommand::<Notification>::new(&self.list, LIST_RESOURCE, "mark_all_read", "all notifications")
            .run(
                |items| update_where(items, |n| !n.read, |n| n.read = true),
                || source.send(Method::POST, &path, None),
            )
            .await;

        self.after_mutation(&result).await;
        result
    }

    pub async fn delete(&self, notification_id: &str) -> Result<MutationOutcome> {
        let path = resource_path(NOTIFICATIONS_PATH, notification_id, None);
        let target = format!("notification {}", notification_id);
        let source = self.list.source();

        let result = OptimisticCommand::<Notification>::new(&self.list, LIST_RESOURCE, "delete", &target)
            .run(
                |items| remove_where(items, |n| n.id == notification_id),
                || source.send(Method::DELETE, &path, None),
            )
            .await;

        self.after_mutation(&result).await;
        result
    }

    async fn after_mutation(&self, result: &Result<MutationOutcome>) {
        match result {
            Ok(_) => {
                // The badge count comes from the backend, so re-read it
                if let Err(e) = self.badge.refresh().await {
                    warn!(error = %e, "Failed to refresh unread count");
                }
            }
            Err(e) => self.banner.from_error(e),
        }
    }

    pub fn close(&self) {
        self.badge.close();
        self.list.close();
    }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        self.close();
    }
}
