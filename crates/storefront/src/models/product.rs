//! Catalog product.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use prostore_core::{Price, ProductId};

/// A product as stored in the catalog.
///
/// The cart only relies on `id`, `name`, `slug`, `price` and `stock`; the
/// remaining fields are served to the product pages.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub brand: String,
    pub description: String,
    pub images: Vec<String>,
    pub price: Price,
    pub stock: i32,
    pub rating: Decimal,
    pub num_reviews: i32,
    pub is_featured: bool,
    pub banner: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether `requested` units can be put in a cart right now.
    #[must_use]
    pub fn has_stock_for(&self, requested: u32) -> bool {
        i64::from(self.stock) >= i64::from(requested)
    }
}

/// Fields needed to insert a product (used by seeding and tests).
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub category: String,
    pub brand: String,
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub price: Price,
    pub stock: i32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub banner: Option<String>,
}
