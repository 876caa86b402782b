//! Storefront wishlist view

use reqwest::Method;
use crate::models::WishlistItem;
use crate::services::source::DataSource;
use crate::state::optimistic::{remove_where, MutationOutcome, OptimisticCommand};
use crate::state::resource::{FetchOutcome, ResourceSpec, ResourceView};
use crate::utils::errors::Result;
use crate::utils::helpers::resource_path;
use crate::views::banner::BannerSlot;

const WISHLIST_PATH: &str = "/api/wishlist";
const WISHLIST_RESOURCE: &str = "wishlist";

#[derive(Debug)]
pub struct Wishlist {
    view: ResourceView,
    banner: BannerSlot,
}

impl Wishlist {
    pub fn new(source: DataSource) -> Self {
        let specs = vec![ResourceSpec::enveloped(WISHLIST_RESOURCE, WISHLIST_PATH, "wishlist")];

        Self {
            view: ResourceView::new("wishlist", source, specs),
            banner: BannerSlot::default(),
        }
    }

    pub async fn mount(&self) -> Result<FetchOutcome> {
        self.view.refresh().await.map_err(|e| {
            self.banner.from_error(&e);
            e
        })
    }

    pub fn view(&self) -> &ResourceView {
        &self.view
    }

    pub fn banner(&self) -> &BannerSlot {
        &self.banner
    }

    pub fn items(&self) -> Result<Vec<WishlistItem>> {
        self.view.state().items(WISHLIST_RESOURCE)
    }

    pub fn total_price(&self) -> Result<f64> {
        Ok(self.items()?.iter().map(|item| item.price).sum())
    }

    /// Remove an item; it reappears if the backend refuses
    pub async fn remove(&self, item_id: &str) -> Result<MutationOutcome> {
        let path = resource_path(WISHLIST_PATH, item_id, None);
        let target = format!("wishlist item {}", item_id);
        let source = self.view.source();

        let result = OptimisticCommand::<WishlistItem>::new(&self.view, WISHLIST_RESOURCE, "remove", &target)
            .run(
                |items| remove_where(items, |item| item.id == item_id),
                || source.send(Method::DELETE, &path, None),
            )
            .await;

        match &result {
            Ok(_) => self.banner.success("Removed from wishlist"),
            Err(e) => self.banner.from_error(e),
        }
        result
    }

    pub fn close(&self) {
        self.view.close();
    }
}

impl Drop for Wishlist {
    fn drop(&mut self) {
        self.view.close();
    }
}
