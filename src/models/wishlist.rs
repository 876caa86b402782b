//! Storefront wishlist item

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::utils::helpers::deserialize_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    pub added_at: Option<DateTime<Utc>>,
}
