//! Orders and their line items.

use chrono::{DateTime, Utc};
use serde::Serialize;

use prostore_core::{
    CartItem, CartTotals, Email, OrderId, PaymentMethod, Price, ProductId, ShippingAddress, UserId,
};

/// A placed order.
///
/// Addresses, payment method and prices are snapshots taken at placement time;
/// later edits to the user or the catalog do not change them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(flatten)]
    pub totals: CartTotals,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One line of an order, copied from the cart line it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub image: String,
    pub price: Price,
    pub qty: u32,
}

impl OrderItem {
    /// Copy a cart line into an order line.
    #[must_use]
    pub fn from_cart_item(order_id: OrderId, item: &CartItem) -> Self {
        Self {
            order_id,
            product_id: item.product_id,
            name: item.name.clone(),
            slug: item.slug.clone(),
            image: item.image.clone(),
            price: item.price,
            qty: item.qty,
        }
    }
}

/// Everything needed to insert an order header.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub totals: CartTotals,
}

/// Name and email of the user who placed an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderUser {
    pub name: String,
    pub email: Email,
}

/// An order with its lines and owner contact details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    #[serde(rename = "orderitems")]
    pub items: Vec<OrderItem>,
    pub user: OrderUser,
}
