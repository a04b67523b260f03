//! Cart line items and their input validation.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::validation::ValidationErrors;

/// One product's line in a cart, with the unit price captured when it was
/// first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub image: String,
    pub price: Price,
    pub qty: u32,
}

impl CartItem {
    /// Unit price multiplied by quantity, unrounded.
    #[must_use]
    pub fn line_total(&self) -> rust_decimal::Decimal {
        self.price.amount() * rust_decimal::Decimal::from(self.qty)
    }
}

/// Untrusted add-to-cart payload as submitted by a client.
///
/// Every field is loosely typed so that all problems can be reported at once
/// by [`CartItemInput::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartItemInput {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub price: serde_json::Value,
    #[serde(default)]
    pub qty: serde_json::Value,
}

impl CartItemInput {
    /// Validate the payload into a [`CartItem`].
    ///
    /// # Errors
    ///
    /// Returns every field-level violation found, in field order.
    pub fn validate(self) -> Result<CartItem, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let product_id = if self.product_id.trim().is_empty() {
            errors.push("Product is required");
            None
        } else {
            self.product_id.parse::<ProductId>().map_or_else(
                |_| {
                    errors.push("Product id is invalid");
                    None
                },
                Some,
            )
        };
        require(&mut errors, &self.name, "Name is required");
        require(&mut errors, &self.slug, "Slug is required");
        require(&mut errors, &self.image, "Image is required");

        let price = match serde_json::from_value::<Price>(self.price) {
            Ok(price) => Some(price),
            Err(_) => {
                errors.push("Price must have exactly two decimal places");
                None
            }
        };
        let qty = match self.qty.as_u64().and_then(|q| u32::try_from(q).ok()) {
            Some(qty) if qty > 0 => Some(qty),
            _ => {
                errors.push("Quantity must be a positive number");
                None
            }
        };

        match (product_id, price, qty) {
            (Some(product_id), Some(price), Some(qty)) if errors.is_empty() => Ok(CartItem {
                product_id,
                name: self.name.trim().to_owned(),
                slug: self.slug.trim().to_owned(),
                image: self.image.trim().to_owned(),
                price,
                qty,
            }),
            _ => Err(errors),
        }
    }
}

fn require(errors: &mut ValidationErrors, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(message);
    }
}
