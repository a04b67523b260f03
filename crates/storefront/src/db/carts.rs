//! Cart queries.

use chrono::{DateTime, Utc};
use sqlx::types::Json;

use prostore_core::{CartId, CartItem, CartTotals, Price, SessionCartId, UserId};

use super::{CartRepository, PgStore, RepositoryError};
use crate::models::{Cart, NewCart};

const CART_COLUMNS: &str = "id, user_id, session_cart_id, items, items_price, shipping_price, \
     tax_price, total_price, created_at";

#[derive(sqlx::FromRow)]
struct CartRow {
    id: CartId,
    user_id: Option<UserId>,
    session_cart_id: SessionCartId,
    items: Json<Vec<CartItem>>,
    items_price: Price,
    shipping_price: Price,
    tax_price: Price,
    total_price: Price,
    created_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            session_cart_id: row.session_cart_id,
            items: row.items.0,
            totals: CartTotals {
                items_price: row.items_price,
                shipping_price: row.shipping_price,
                tax_price: row.tax_price,
                total_price: row.total_price,
            },
            created_at: row.created_at,
        }
    }
}

impl CartRepository for PgStore {
    async fn cart_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "SELECT {CART_COLUMNS} FROM storefront.cart WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Cart::from))
    }

    async fn cart_by_session(
        &self,
        session_cart_id: SessionCartId,
    ) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "SELECT {CART_COLUMNS} FROM storefront.cart \
             WHERE session_cart_id = $1 AND user_id IS NULL \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(session_cart_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Cart::from))
    }

    async fn create_cart(&self, cart: NewCart) -> Result<Cart, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "INSERT INTO storefront.cart \
                 (id, user_id, session_cart_id, items, items_price, shipping_price, \
                  tax_price, total_price) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {CART_COLUMNS}"
        ))
        .bind(CartId::generate())
        .bind(cart.user_id)
        .bind(cart.session_cart_id)
        .bind(Json(&cart.items))
        .bind(cart.totals.items_price)
        .bind(cart.totals.shipping_price)
        .bind(cart.totals.tax_price)
        .bind(cart.totals.total_price)
        .fetch_one(self.pool())
        .await?;

        Ok(row.into())
    }

    async fn save_cart_items(
        &self,
        id: CartId,
        items: &[CartItem],
        totals: CartTotals,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE storefront.cart \
             SET items = $2, items_price = $3, shipping_price = $4, tax_price = $5, \
                 total_price = $6 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(Json(items))
        .bind(totals.items_price)
        .bind(totals.shipping_price)
        .bind(totals.tax_price)
        .bind(totals.total_price)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn transfer_cart(&self, id: CartId, user_id: UserId) -> Result<(), RepositoryError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM storefront.cart WHERE user_id = $1 AND id <> $2")
            .bind(user_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("UPDATE storefront.cart SET user_id = $2 WHERE id = $1")
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back the delete.
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}
