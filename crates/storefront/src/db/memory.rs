//! In-memory [`Store`] for unit tests.
//!
//! All state sits behind one mutex. Operations that write several records
//! work on a copy of the state and swap it in only when every step succeeded,
//! which mirrors the transactional behaviour of [`super::PgStore`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use rust_decimal::Decimal;

use prostore_core::{
    CartId, CartItem, CartTotals, Email, OrderId, PaymentMethod, ProductId, SessionCartId,
    ShippingAddress, UserId, UserRole,
};

use super::{
    CartRepository, OrderRepository, ProductRepository, RepositoryError, Store, UserRepository,
};
use crate::models::{
    Cart, NewCart, NewOrder, NewProduct, NewUser, Order, OrderDetail, OrderItem, OrderUser,
    Product, User,
};

#[derive(Debug, Clone, Default)]
struct State {
    products: Vec<Product>,
    users: Vec<(User, String)>,
    carts: Vec<Cart>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
    fail_order_items: Arc<Mutex<bool>>,
}

fn injected_failure() -> RepositoryError {
    RepositoryError::Database(sqlx::Error::Protocol(
        "injected order item failure".to_owned(),
    ))
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next `place_order` fail after the order header is written.
    pub fn fail_next_order_items(&self) {
        *self
            .fail_order_items
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = true;
    }

    fn take_order_item_failure(&self) -> bool {
        std::mem::take(
            &mut *self
                .fail_order_items
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Insert a product with the given price and stock; the rest is filler.
    pub fn add_product(&self, name: &str, price: &str, stock: i32) -> Product {
        let product = Product {
            id: ProductId::generate(),
            name: name.to_owned(),
            slug: name.to_lowercase().replace(' ', "-"),
            category: "Shirts".to_owned(),
            brand: "ProStore".to_owned(),
            description: format!("{name} description"),
            images: vec![format!("/images/{}.jpg", name.to_lowercase())],
            price: price.parse().unwrap_or_default(),
            stock,
            rating: Decimal::ZERO,
            num_reviews: 0,
            is_featured: false,
            banner: None,
            created_at: Utc::now(),
        };
        self.lock().products.push(product.clone());
        product
    }

    /// Change a product's stock count.
    pub fn set_stock(&self, id: ProductId, stock: i32) {
        if let Some(product) = self.lock().products.iter_mut().find(|p| p.id == id) {
            product.stock = stock;
        }
    }

    /// Remove a user record while leaving everything else intact.
    pub fn delete_user(&self, id: UserId) {
        self.lock().users.retain(|(user, _)| user.id != id);
    }

    #[must_use]
    pub fn carts(&self) -> Vec<Cart> {
        self.lock().carts.clone()
    }

    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.lock().orders.clone()
    }

    #[must_use]
    pub fn order_items(&self) -> Vec<OrderItem> {
        self.lock().order_items.clone()
    }

    fn update_user(&self, id: UserId, f: impl FnOnce(&mut User)) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        let (user, _) = state
            .users
            .iter_mut()
            .find(|(user, _)| user.id == id)
            .ok_or(RepositoryError::NotFound)?;
        f(user);
        user.updated_at = Utc::now();
        Ok(())
    }
}

impl ProductRepository for MemoryStore {
    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.lock().products.iter().find(|p| p.id == id).cloned())
    }

    async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        Ok(self.lock().products.iter().find(|p| p.slug == slug).cloned())
    }

    async fn latest_products(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let mut products = self.lock().products.clone();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        products.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(products)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let mut state = self.lock();
        if state.products.iter().any(|p| p.slug == product.slug) {
            return Err(RepositoryError::Conflict("slug".to_owned()));
        }
        let created = Product {
            id: ProductId::generate(),
            name: product.name,
            slug: product.slug,
            category: product.category,
            brand: product.brand,
            description: product.description,
            images: product.images,
            price: product.price,
            stock: product.stock,
            rating: Decimal::ZERO,
            num_reviews: 0,
            is_featured: product.is_featured,
            banner: product.banner,
            created_at: Utc::now(),
        };
        state.products.push(created.clone());
        Ok(created)
    }
}

impl UserRepository for MemoryStore {
    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|(user, _)| user.id == id)
            .map(|(user, _)| user.clone()))
    }

    async fn user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .user_credentials(email)
            .await?
            .map(|(user, _)| user))
    }

    async fn user_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|(user, _)| &user.email == email)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut state = self.lock();
        if state.users.iter().any(|(u, _)| u.email == user.email) {
            return Err(RepositoryError::Conflict("email".to_owned()));
        }
        let now = Utc::now();
        let created = User {
            id: UserId::generate(),
            name: user.name,
            email: user.email,
            role: user.role,
            address: None,
            payment_method: None,
            created_at: now,
            updated_at: now,
        };
        state.users.push((created.clone(), user.password_hash));
        Ok(created)
    }

    async fn update_user_name(&self, id: UserId, name: &str) -> Result<(), RepositoryError> {
        self.update_user(id, |user| name.clone_into(&mut user.name))
    }

    async fn update_user_address(
        &self,
        id: UserId,
        address: &ShippingAddress,
    ) -> Result<(), RepositoryError> {
        self.update_user(id, |user| user.address = Some(address.clone()))
    }

    async fn update_user_payment_method(
        &self,
        id: UserId,
        method: PaymentMethod,
    ) -> Result<(), RepositoryError> {
        self.update_user(id, |user| user.payment_method = Some(method))
    }

    async fn set_user_role(&self, email: &Email, role: UserRole) -> Result<(), RepositoryError> {
        let id = self
            .user_by_email(email)
            .await?
            .ok_or(RepositoryError::NotFound)?
            .id;
        self.update_user(id, |user| user.role = role)
    }
}

impl CartRepository for MemoryStore {
    async fn cart_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        Ok(self
            .lock()
            .carts
            .iter()
            .rev()
            .find(|c| c.user_id == Some(user_id))
            .cloned())
    }

    async fn cart_by_session(
        &self,
        session_cart_id: SessionCartId,
    ) -> Result<Option<Cart>, RepositoryError> {
        Ok(self
            .lock()
            .carts
            .iter()
            .rev()
            .find(|c| c.session_cart_id == session_cart_id && c.user_id.is_none())
            .cloned())
    }

    async fn create_cart(&self, cart: NewCart) -> Result<Cart, RepositoryError> {
        let created = Cart {
            id: CartId::generate(),
            user_id: cart.user_id,
            session_cart_id: cart.session_cart_id,
            items: cart.items,
            totals: cart.totals,
            created_at: Utc::now(),
        };
        self.lock().carts.push(created.clone());
        Ok(created)
    }

    async fn save_cart_items(
        &self,
        id: CartId,
        items: &[CartItem],
        totals: CartTotals,
    ) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        let cart = state
            .carts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        cart.items = items.to_vec();
        cart.totals = totals;
        Ok(())
    }

    async fn transfer_cart(&self, id: CartId, user_id: UserId) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        if !state.carts.iter().any(|c| c.id == id) {
            return Err(RepositoryError::NotFound);
        }
        state
            .carts
            .retain(|c| c.id == id || c.user_id != Some(user_id));
        if let Some(cart) = state.carts.iter_mut().find(|c| c.id == id) {
            cart.user_id = Some(user_id);
        }
        Ok(())
    }
}

impl OrderRepository for MemoryStore {
    async fn place_order(
        &self,
        order: NewOrder,
        items: &[CartItem],
        cart_id: CartId,
    ) -> Result<OrderId, RepositoryError> {
        let fail_items = self.take_order_item_failure();
        let mut state = self.lock();
        let mut staged = state.clone();

        let order_id = OrderId::generate();
        staged.orders.push(Order {
            id: order_id,
            user_id: order.user_id,
            shipping_address: order.shipping_address,
            payment_method: order.payment_method,
            totals: order.totals,
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
            created_at: Utc::now(),
        });

        if fail_items {
            return Err(injected_failure());
        }
        staged
            .order_items
            .extend(items.iter().map(|item| OrderItem::from_cart_item(order_id, item)));

        let cart = staged
            .carts
            .iter_mut()
            .find(|c| c.id == cart_id)
            .ok_or(RepositoryError::NotFound)?;
        cart.items.clear();
        cart.totals = CartTotals::zero();

        *state = staged;
        Ok(order_id)
    }

    async fn order_detail(&self, id: OrderId) -> Result<Option<OrderDetail>, RepositoryError> {
        let state = self.lock();
        let Some(order) = state.orders.iter().find(|o| o.id == id).cloned() else {
            return Ok(None);
        };
        let (user, _) = state
            .users
            .iter()
            .find(|(user, _)| user.id == order.user_id)
            .ok_or_else(|| RepositoryError::DataCorruption("order without user".to_owned()))?;
        let items = state
            .order_items
            .iter()
            .filter(|item| item.order_id == id)
            .cloned()
            .collect();

        Ok(Some(OrderDetail {
            user: OrderUser {
                name: user.name.clone(),
                email: user.email.clone(),
            },
            order,
            items,
        }))
    }
}

impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_cart(session: SessionCartId, user_id: Option<UserId>) -> NewCart {
        NewCart {
            user_id,
            session_cart_id: session,
            items: Vec::new(),
            totals: CartTotals::zero(),
        }
    }

    #[tokio::test]
    async fn test_transfer_cart_replaces_user_carts() {
        let store = MemoryStore::new();
        let user_id = UserId::generate();
        let stale = store
            .create_cart(new_cart(SessionCartId::generate(), Some(user_id)))
            .await
            .unwrap();
        let fresh = store
            .create_cart(new_cart(SessionCartId::generate(), None))
            .await
            .unwrap();

        store.transfer_cart(fresh.id, user_id).await.unwrap();

        let carts = store.carts();
        assert_eq!(carts.len(), 1);
        assert_eq!(carts[0].id, fresh.id);
        assert_eq!(carts[0].user_id, Some(user_id));
        assert!(carts.iter().all(|c| c.id != stale.id));
    }

    #[tokio::test]
    async fn test_cart_by_user_returns_newest() {
        let store = MemoryStore::new();
        let user_id = UserId::generate();
        store
            .create_cart(new_cart(SessionCartId::generate(), Some(user_id)))
            .await
            .unwrap();
        let newer = store
            .create_cart(new_cart(SessionCartId::generate(), Some(user_id)))
            .await
            .unwrap();

        let found = store.cart_by_user(user_id).await.unwrap().unwrap();
        assert_eq!(found.id, newer.id);
    }

    #[tokio::test]
    async fn test_cart_by_session_skips_owned_carts() {
        let store = MemoryStore::new();
        let session = SessionCartId::generate();
        store
            .create_cart(new_cart(session, Some(UserId::generate())))
            .await
            .unwrap();

        assert!(store.cart_by_session(session).await.unwrap().is_none());

        let anonymous = store.create_cart(new_cart(session, None)).await.unwrap();
        let found = store.cart_by_session(session).await.unwrap().unwrap();
        assert_eq!(found.id, anonymous.id);
    }

    #[tokio::test]
    async fn test_transfer_missing_cart_changes_nothing() {
        let store = MemoryStore::new();
        let user_id = UserId::generate();
        store
            .create_cart(new_cart(SessionCartId::generate(), Some(user_id)))
            .await
            .unwrap();

        let result = store.transfer_cart(CartId::generate(), user_id).await;

        assert!(matches!(result, Err(RepositoryError::NotFound)));
        assert_eq!(store.carts().len(), 1);
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_email() {
        let store = MemoryStore::new();
        let user = NewUser {
            name: "Jane".to_owned(),
            email: Email::parse("jane@example.com").unwrap(),
            password_hash: "hash".to_owned(),
            role: UserRole::User,
        };
        store.create_user(user.clone()).await.unwrap();

        let result = store.create_user(user).await;

        assert!(matches!(result, Err(RepositoryError::Conflict(field)) if field == "email"));
    }
}
