//! Cart operations.
//!
//! Every mutation is read, modify, write: the cart is loaded for the current
//! owner, its lines are changed in memory, totals are recomputed and lines
//! and totals are saved in a single write. Concurrent mutations of the same
//! cart are last-write-wins.

use tracing::instrument;

use prostore_core::{CartItem, CartItemInput, PricingRules, ProductId};

use super::CommerceError;
use super::identity::{OwnerKey, RequestContext};
use crate::db::Store;
use crate::models::{ActionResponse, Cart, NewCart};

/// Cart service over a [`Store`].
pub struct CartService<'a, S> {
    store: &'a S,
    pricing: &'a PricingRules,
}

impl<'a, S: Store> CartService<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S, pricing: &'a PricingRules) -> Self {
        Self { store, pricing }
    }

    /// Load the cart of whoever is making the request.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NoSessionCartId` for an anonymous request
    /// without a session cart cookie, or `CommerceError::Persistence` if the
    /// lookup fails.
    #[instrument(skip(self, ctx))]
    pub async fn get_cart(&self, ctx: &RequestContext) -> Result<Option<Cart>, CommerceError> {
        let cart = match ctx.owner()? {
            OwnerKey::User(user_id) => self.store.cart_by_user(user_id).await?,
            OwnerKey::Session(session_cart_id) => {
                self.store.cart_by_session(session_cart_id).await?
            }
        };
        Ok(cart)
    }

    /// Add a product to the cart, creating the cart on first use.
    ///
    /// A new line keeps the requested quantity and needs that much stock. A
    /// line already in the cart grows by one unit.
    #[instrument(skip(self, ctx, input))]
    pub async fn add_item(&self, ctx: &RequestContext, input: CartItemInput) -> ActionResponse {
        action_response(self.try_add_item(ctx, input).await)
    }

    /// Take one unit of a product out of the cart.
    #[instrument(skip(self, ctx))]
    pub async fn remove_item(&self, ctx: &RequestContext, product_id: ProductId) -> ActionResponse {
        action_response(self.try_remove_item(ctx, product_id).await)
    }

    async fn try_add_item(
        &self,
        ctx: &RequestContext,
        input: CartItemInput,
    ) -> Result<String, CommerceError> {
        ctx.owner()?;
        let mut item = input.validate()?;

        let product = self
            .store
            .product_by_id(item.product_id)
            .await?
            .ok_or(CommerceError::ProductNotFound)?;
        // The catalog price is authoritative.
        item.price = product.price;

        let Some(mut cart) = self.get_cart(ctx).await? else {
            if !product.has_stock_for(item.qty) {
                return Err(CommerceError::OutOfStock);
            }
            let session_cart_id = ctx.session_cart_id.ok_or(CommerceError::NoSessionCartId)?;
            let items = vec![item];
            let totals = self.pricing.compute_totals(&items);
            let cart = self
                .store
                .create_cart(NewCart {
                    user_id: ctx.user_id(),
                    session_cart_id,
                    items,
                    totals,
                })
                .await?;
            tracing::info!(cart_id = %cart.id, product_id = %product.id, "cart created");
            return Ok(format!("{} added to cart", product.name));
        };

        let updated = match cart
            .items
            .iter_mut()
            .find(|line| line.product_id == item.product_id)
        {
            Some(line) => {
                let qty = line.qty.saturating_add(1);
                if !product.has_stock_for(qty) {
                    return Err(CommerceError::OutOfStock);
                }
                line.qty = qty;
                true
            }
            None => {
                if !product.has_stock_for(item.qty) {
                    return Err(CommerceError::OutOfStock);
                }
                cart.items.push(item);
                false
            }
        };

        self.save(&cart).await?;
        tracing::info!(cart_id = %cart.id, product_id = %product.id, updated, "cart item added");

        if updated {
            Ok(format!("{} updated in cart", product.name))
        } else {
            Ok(format!("{} added to cart", product.name))
        }
    }

    async fn try_remove_item(
        &self,
        ctx: &RequestContext,
        product_id: ProductId,
    ) -> Result<String, CommerceError> {
        ctx.owner()?;
        let product = self
            .store
            .product_by_id(product_id)
            .await?
            .ok_or(CommerceError::ProductNotFound)?;

        let mut cart = self
            .get_cart(ctx)
            .await?
            .ok_or(CommerceError::CartNotFound)?;

        let index = cart
            .items
            .iter()
            .position(|line| line.product_id == product_id)
            .ok_or(CommerceError::ItemNotFound)?;

        decrement_line(&mut cart.items, index);

        self.save(&cart).await?;
        tracing::info!(cart_id = %cart.id, product_id = %product.id, "cart item removed");

        Ok(format!("{} was removed from cart", product.name))
    }

    async fn save(&self, cart: &Cart) -> Result<(), CommerceError> {
        let totals = self.pricing.compute_totals(&cart.items);
        self.store
            .save_cart_items(cart.id, &cart.items, totals)
            .await?;
        Ok(())
    }
}

/// Drop the line at `index` if it holds one unit, else take one unit off.
fn decrement_line(items: &mut Vec<CartItem>, index: usize) {
    let Some(line) = items.get_mut(index) else {
        return;
    };
    if line.qty > 1 {
        line.qty -= 1;
    } else {
        items.remove(index);
    }
}

/// Turn a cart operation outcome into the shopper-facing envelope.
pub(crate) fn action_response(result: Result<String, CommerceError>) -> ActionResponse {
    match result {
        Ok(message) => ActionResponse::ok(message),
        Err(err) => {
            if err.is_internal() {
                tracing::error!(error = ?err, "storefront action failed");
            } else {
                tracing::debug!(error = %err, "storefront action rejected");
            }
            ActionResponse::failed(err.to_string())
        }
    }
}
