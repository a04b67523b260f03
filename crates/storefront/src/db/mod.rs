//! Database operations for storefront `PostgreSQL`.
//!
//! # Schema: `storefront`
//!
//! ## Tables
//!
//! - `user` - Accounts with argon2 password hashes, saved address and payment method
//! - `product` - Catalog
//! - `cart` - One cart per session/user; lines stored as JSONB next to the four totals
//! - `order` / `order_item` - Placed orders and their frozen lines
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Repositories
//!
//! Services never talk to `sqlx` directly. They are generic over [`Store`],
//! which bundles the four repository traits below. [`PgStore`] is the
//! production implementation; `memory::MemoryStore` backs the unit tests.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p prostore-cli -- migrate
//! ```

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use prostore_core::{
    CartId, CartItem, CartTotals, Email, OrderId, PaymentMethod, ProductId, SessionCartId,
    ShippingAddress, UserId, UserRole,
};

use crate::models::{Cart, NewCart, NewOrder, NewProduct, NewUser, OrderDetail, Product, User};

mod carts;
#[cfg(test)]
pub mod memory;
mod orders;
mod products;
mod users;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
fn conflict_on_unique(field: &str) -> impl FnOnce(sqlx::Error) -> RepositoryError + '_ {
    move |e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict(field.to_owned());
        }
        RepositoryError::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Read access to the catalog.
pub trait ProductRepository {
    fn product_by_id(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, RepositoryError>> + Send;

    fn product_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<Product>, RepositoryError>> + Send;

    /// Newest products first.
    fn latest_products(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send;

    /// Insert a product. Fails with `Conflict("slug")` on a duplicate slug.
    fn create_product(
        &self,
        product: NewProduct,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send;
}

/// Accounts.
pub trait UserRepository {
    fn user_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, RepositoryError>> + Send;

    fn user_by_email(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// A user together with their stored password hash.
    fn user_credentials(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<(User, String)>, RepositoryError>> + Send;

    /// Insert a user. Fails with `Conflict("email")` if the email is taken.
    fn create_user(
        &self,
        user: NewUser,
    ) -> impl Future<Output = Result<User, RepositoryError>> + Send;

    fn update_user_name(
        &self,
        id: UserId,
        name: &str,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn update_user_address(
        &self,
        id: UserId,
        address: &ShippingAddress,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn update_user_payment_method(
        &self,
        id: UserId,
        method: PaymentMethod,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn set_user_role(
        &self,
        email: &Email,
        role: UserRole,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Carts. Lines and totals are only ever written together.
pub trait CartRepository {
    /// Newest cart bound to `user_id`.
    fn cart_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<Cart>, RepositoryError>> + Send;

    /// Newest anonymous cart for this browser. Carts already handed over to
    /// a user are never returned here.
    fn cart_by_session(
        &self,
        session_cart_id: SessionCartId,
    ) -> impl Future<Output = Result<Option<Cart>, RepositoryError>> + Send;

    fn create_cart(
        &self,
        cart: NewCart,
    ) -> impl Future<Output = Result<Cart, RepositoryError>> + Send;

    /// Replace a cart's lines and totals in one write.
    fn save_cart_items(
        &self,
        id: CartId,
        items: &[CartItem],
        totals: CartTotals,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Hand a cart to `user_id`, deleting every other cart that user owns.
    ///
    /// Both writes happen atomically.
    fn transfer_cart(
        &self,
        id: CartId,
        user_id: UserId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Orders.
pub trait OrderRepository {
    /// Insert the order and one line per cart item, then empty the cart.
    ///
    /// All three writes commit together or not at all.
    fn place_order(
        &self,
        order: NewOrder,
        items: &[CartItem],
        cart_id: CartId,
    ) -> impl Future<Output = Result<OrderId, RepositoryError>> + Send;

    fn order_detail(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<Option<OrderDetail>, RepositoryError>> + Send;
}

/// Everything the storefront needs from persistence.
pub trait Store:
    ProductRepository + UserRepository + CartRepository + OrderRepository + Clone + Send + Sync + 'static
{
    /// Check the backing store is reachable.
    fn ping(&self) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// `PostgreSQL`-backed [`Store`].
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_on_unique_passes_other_errors_through() {
        let err = conflict_on_unique("email")(sqlx::Error::RowNotFound);
        assert!(matches!(
            err,
            RepositoryError::Database(sqlx::Error::RowNotFound)
        ));
    }

    #[test]
    fn test_repository_error_messages() {
        assert_eq!(RepositoryError::NotFound.to_string(), "not found");
        assert_eq!(
            RepositoryError::Conflict("email".to_owned()).to_string(),
            "constraint violation: email"
        );
    }
}
