//! Checkout: turning a cart into an order.

use tracing::instrument;

use prostore_core::OrderId;

use super::CommerceError;
use super::identity::RequestContext;
use crate::db::Store;
use crate::models::{NewOrder, OrderActionResponse, OrderDetail};

/// Order service over a [`Store`].
pub struct OrderService<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> OrderService<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Place an order from the signed-in user's cart.
    ///
    /// Preconditions are checked in order: signed in, non-empty cart, saved
    /// shipping address, saved payment method. Each failure carries the page
    /// the shopper should be sent to.
    #[instrument(skip(self, ctx), fields(user_id))]
    pub async fn create_order(&self, ctx: &RequestContext) -> OrderActionResponse {
        match self.try_create_order(ctx).await {
            Ok(order_id) => {
                tracing::info!(%order_id, "order created");
                OrderActionResponse::placed(format!("/order/{order_id}"))
            }
            Err(err) => {
                if err.is_internal() {
                    tracing::error!(error = ?err, "order creation failed");
                } else {
                    tracing::debug!(error = %err, "order creation rejected");
                }
                match err.redirect_to() {
                    Some(redirect_to) => OrderActionResponse::incomplete(err.to_string(), redirect_to),
                    None => OrderActionResponse::failed(err.to_string()),
                }
            }
        }
    }

    /// Load an order with its lines and the buyer's name and email.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Persistence` if the lookup fails.
    #[instrument(skip(self))]
    pub async fn get_order_by_id(
        &self,
        order_id: OrderId,
    ) -> Result<Option<OrderDetail>, CommerceError> {
        Ok(self.store.order_detail(order_id).await?)
    }

    async fn try_create_order(&self, ctx: &RequestContext) -> Result<OrderId, CommerceError> {
        let identity = ctx
            .identity
            .as_ref()
            .ok_or(CommerceError::NotAuthenticated)?;
        tracing::Span::current().record("user_id", tracing::field::display(identity.id));

        let cart = self
            .store
            .cart_by_user(identity.id)
            .await?
            .filter(|cart| !cart.is_empty())
            .ok_or(CommerceError::EmptyCart)?;

        let user = self
            .store
            .user_by_id(identity.id)
            .await?
            .ok_or(CommerceError::UserNotFound)?;
        let shipping_address = user
            .address
            .ok_or(CommerceError::MissingShippingAddress)?;
        let payment_method = user
            .payment_method
            .ok_or(CommerceError::MissingPaymentMethod)?;

        let order = NewOrder {
            user_id: user.id,
            shipping_address,
            payment_method,
            totals: cart.totals,
        };

        self.store
            .place_order(order, &cart.items, cart.id)
            .await
            .map_err(CommerceError::TransactionFailed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use prostore_core::{
        CartItemInput, Email, PaymentMethod, PricingRules, SessionCartId, ShippingAddress,
        UserRole,
    };
    use serde_json::json;

    use super::*;
    use crate::db::UserRepository;
    use crate::db::memory::MemoryStore;
    use crate::models::{CurrentUser, NewUser, User};
    use crate::services::CartService;

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Jane Doe".to_owned(),
            street_address: "1 Main Street".to_owned(),
            city: "Springfield".to_owned(),
            postal_code: "12345".to_owned(),
            country: "USA".to_owned(),
            lat: None,
            lng: None,
        }
    }

    async fn user(store: &MemoryStore) -> User {
        store
            .create_user(NewUser {
                name: "Jane".to_owned(),
                email: Email::parse("jane@example.com").unwrap(),
                password_hash: "hash".to_owned(),
                role: UserRole::User,
            })
            .await
            .unwrap()
    }

    fn ctx_for(user: &User) -> RequestContext {
        RequestContext::new(
            Some(CurrentUser {
                id: user.id,
                name: user.name.clone(),
                email: user.email.clone(),
                role: user.role,
            }),
            Some(SessionCartId::generate()),
        )
    }

    /// A signed-in user with address, payment method and two cart lines.
    async fn ready_to_order(store: &MemoryStore) -> (User, RequestContext) {
        let user = user(store).await;
        store.update_user_address(user.id, &address()).await.unwrap();
        store
            .update_user_payment_method(user.id, PaymentMethod::PayPal)
            .await
            .unwrap();
        let ctx = ctx_for(&user);
        let rules = PricingRules::default();
        let carts = CartService::new(store, &rules);
        for (name, price) in [("Shirt", "60.00"), ("Hat", "15.00")] {
            let product = store.add_product(name, price, 10);
            let response = carts
                .add_item(
                    &ctx,
                    CartItemInput {
                        product_id: product.id.to_string(),
                        name: product.name.clone(),
                        slug: product.slug.clone(),
                        image: "/images/p.jpg".to_owned(),
                        price: json!(price),
                        qty: json!(1),
                    },
                )
                .await;
            assert!(response.success, "{}", response.message);
        }
        (user, ctx)
    }

    #[tokio::test]
    async fn test_create_order_moves_cart_into_order() {
        let store = MemoryStore::new();
        let (user, ctx) = ready_to_order(&store).await;
        let cart_before = store.carts().pop().unwrap();
        let service = OrderService::new(&store);

        let response = service.create_order(&ctx).await;

        assert!(response.success);
        assert_eq!(response.message.as_deref(), Some("Order created successfully"));
        let orders = store.orders();
        assert_eq!(orders.len(), 1);
        let order = &orders[0];
        assert_eq!(
            response.redirect_to,
            Some(format!("/order/{}", order.id))
        );
        assert_eq!(order.user_id, user.id);
        assert_eq!(order.totals, cart_before.totals);
        assert_eq!(order.payment_method, PaymentMethod::PayPal);
        assert_eq!(order.shipping_address, address());
        assert!(!order.is_paid);
        assert_eq!(store.order_items().len(), 2);

        let cart_after = store.carts().pop().unwrap();
        assert!(cart_after.is_empty());
        assert_eq!(cart_after.totals, prostore_core::CartTotals::zero());
    }

    #[tokio::test]
    async fn test_order_detail_includes_items_and_user() {
        let store = MemoryStore::new();
        let (user, ctx) = ready_to_order(&store).await;
        let service = OrderService::new(&store);
        service.create_order(&ctx).await;
        let order_id = store.orders()[0].id;

        let detail = service.get_order_by_id(order_id).await.unwrap().unwrap();

        assert_eq!(detail.order.id, order_id);
        assert_eq!(detail.items.len(), 2);
        assert_eq!(detail.user.name, user.name);
        assert_eq!(detail.user.email, user.email);
        assert!(
            service
                .get_order_by_id(OrderId::generate())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_failed_transaction_changes_nothing() {
        let store = MemoryStore::new();
        let (_, ctx) = ready_to_order(&store).await;
        let cart_before = store.carts().pop().unwrap();
        store.fail_next_order_items();

        let response = OrderService::new(&store).create_order(&ctx).await;

        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Order not created"));
        assert_eq!(response.redirect_to, None);
        assert!(store.orders().is_empty());
        assert!(store.order_items().is_empty());
        assert_eq!(store.carts().pop().unwrap(), cart_before);
    }

    #[tokio::test]
    async fn test_requires_sign_in() {
        let store = MemoryStore::new();
        let ctx = RequestContext::new(None, Some(SessionCartId::generate()));

        let response = OrderService::new(&store).create_order(&ctx).await;

        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("User not authenticated"));
        assert_eq!(response.redirect_to.as_deref(), Some("/sign-in"));
    }

    #[tokio::test]
    async fn test_empty_cart_redirects_to_cart() {
        let store = MemoryStore::new();
        let user = user(&store).await;

        let response = OrderService::new(&store).create_order(&ctx_for(&user)).await;

        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Cart is empty"));
        assert_eq!(response.redirect_to.as_deref(), Some("/cart"));
        assert!(store.orders().is_empty());
    }

    #[tokio::test]
    async fn test_missing_address_then_payment_method() {
        let store = MemoryStore::new();
        let (user, ctx) = ready_to_order(&store).await;
        let service = OrderService::new(&store);

        // Wipe both; address is reported first.
        store.delete_user(user.id);
        let recreated = store
            .create_user(NewUser {
                name: user.name.clone(),
                email: Email::parse("john@example.com").unwrap(),
                password_hash: "hash".to_owned(),
                role: UserRole::User,
            })
            .await
            .unwrap();
        let moved = ctx_for(&recreated);
        let cart = store.carts().pop().unwrap();
        crate::services::merge_session_cart(&store, recreated.id, Some(cart.session_cart_id))
            .await
            .unwrap();

        let response = service.create_order(&moved).await;
        assert_eq!(response.redirect_to.as_deref(), Some("/shipping-address"));
        assert_eq!(response.message.as_deref(), Some("No shipping address"));

        store
            .update_user_address(recreated.id, &address())
            .await
            .unwrap();
        let response = service.create_order(&moved).await;
        assert_eq!(response.redirect_to.as_deref(), Some("/payment-method"));
        assert_eq!(response.message.as_deref(), Some("No payment method"));
        assert!(store.orders().is_empty());

        // The original session no longer owns a cart.
        let response = service.create_order(&ctx).await;
        assert_eq!(response.redirect_to.as_deref(), Some("/cart"));
    }

    #[tokio::test]
    async fn test_vanished_user() {
        let store = MemoryStore::new();
        let (user, ctx) = ready_to_order(&store).await;
        store.delete_user(user.id);

        let response = OrderService::new(&store).create_order(&ctx).await;

        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("User not found"));
        assert!(store.orders().is_empty());
    }
}
