//! Shopping cart.

use chrono::{DateTime, Utc};
use serde::Serialize;

use prostore_core::{CartId, CartItem, CartTotals, ProductId, SessionCartId, UserId};

/// A persisted cart.
///
/// A cart is always bound to the anonymous session that created it; once its
/// owner signs in it is also bound to that user, and the user binding wins
/// for lookups. `totals` is always the pricing output for `items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cart {
    pub id: CartId,
    pub user_id: Option<UserId>,
    pub session_cart_id: SessionCartId,
    pub items: Vec<CartItem>,
    #[serde(flatten)]
    pub totals: CartTotals,
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Find the line for `product_id`, if any.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.qty).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Fields needed to create a cart.
#[derive(Debug, Clone)]
pub struct NewCart {
    pub user_id: Option<UserId>,
    pub session_cart_id: SessionCartId,
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}
