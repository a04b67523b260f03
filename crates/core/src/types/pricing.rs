//! Cart pricing rules.
//!
//! Every cart write stores the four totals produced here next to the items
//! they were computed from. Each intermediate is rounded half-up to cents on
//! its own, and later steps consume the already-rounded values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::CartItem;
use super::price::{Price, round2};

/// Shipping and tax parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingRules {
    /// Orders with an items subtotal strictly above this ship free.
    pub free_shipping_threshold: Decimal,
    /// Flat shipping fee charged at or below the threshold.
    pub flat_shipping: Decimal,
    /// Tax rate applied to the items subtotal (0.15 = 15%).
    pub tax_rate: Decimal,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::from(100),
            flat_shipping: Decimal::from(10),
            tax_rate: Decimal::new(15, 2),
        }
    }
}

impl PricingRules {
    /// Compute the cart totals for `items`.
    ///
    /// An empty cart owes nothing, shipping included.
    #[must_use]
    pub fn compute_totals(&self, items: &[CartItem]) -> CartTotals {
        if items.is_empty() {
            return CartTotals::zero();
        }

        let items_price = round2(items.iter().map(CartItem::line_total).sum());
        let shipping_price = if items_price > self.free_shipping_threshold {
            round2(Decimal::ZERO)
        } else {
            round2(self.flat_shipping)
        };
        let tax_price = round2(items_price * self.tax_rate);
        let total_price = round2(items_price + shipping_price + tax_price);

        CartTotals {
            items_price: to_price(items_price),
            shipping_price: to_price(shipping_price),
            tax_price: to_price(tax_price),
            total_price: to_price(total_price),
        }
    }
}

// Inputs are non-negative prices and quantities, so the sums are too.
fn to_price(amount: Decimal) -> Price {
    Price::new(amount).unwrap_or_else(|_| Price::zero())
}

/// Compute totals with the default rules.
#[must_use]
pub fn compute_totals(items: &[CartItem]) -> CartTotals {
    PricingRules::default().compute_totals(items)
}

/// The four price fields carried by carts and orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub items_price: Price,
    pub shipping_price: Price,
    pub tax_price: Price,
    pub total_price: Price,
}

impl CartTotals {
    /// All four totals at `0.00`; what an emptied cart carries.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            items_price: Price::zero(),
            shipping_price: Price::zero(),
            tax_price: Price::zero(),
            total_price: Price::zero(),
        }
    }
}
