//! Order queries.
//!
//! Placing an order is the one multi-table write in the storefront: the
//! order header, its lines and the emptied cart commit in a single
//! transaction.

use chrono::{DateTime, Utc};
use sqlx::types::Json;

use prostore_core::{
    CartId, CartItem, CartTotals, Email, OrderId, PaymentMethod, Price, ProductId,
    ShippingAddress, UserId,
};

use super::{OrderRepository, PgStore, RepositoryError};
use crate::models::{NewOrder, Order, OrderDetail, OrderItem, OrderUser};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    shipping_address: Json<ShippingAddress>,
    payment_method: String,
    items_price: Price,
    shipping_price: Price,
    tax_price: Price,
    total_price: Price,
    is_paid: bool,
    paid_at: Option<DateTime<Utc>>,
    is_delivered: bool,
    delivered_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    user_name: String,
    user_email: String,
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    order_id: OrderId,
    product_id: ProductId,
    name: String,
    slug: String,
    image: String,
    price: Price,
    qty: i32,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        let qty = u32::try_from(row.qty).map_err(|_| {
            RepositoryError::DataCorruption(format!("negative order item qty: {}", row.qty))
        })?;

        Ok(Self {
            order_id: row.order_id,
            product_id: row.product_id,
            name: row.name,
            slug: row.slug,
            image: row.image,
            price: row.price,
            qty,
        })
    }
}

fn qty_column(qty: u32) -> Result<i32, RepositoryError> {
    i32::try_from(qty).map_err(|_| RepositoryError::DataCorruption(format!("qty too large: {qty}")))
}

impl OrderRepository for PgStore {
    async fn place_order(
        &self,
        order: NewOrder,
        items: &[CartItem],
        cart_id: CartId,
    ) -> Result<OrderId, RepositoryError> {
        let order_id = OrderId::generate();
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            "INSERT INTO storefront.order \
                 (id, user_id, shipping_address, payment_method, items_price, \
                  shipping_price, tax_price, total_price) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(order_id)
        .bind(order.user_id)
        .bind(Json(&order.shipping_address))
        .bind(order.payment_method.as_str())
        .bind(order.totals.items_price)
        .bind(order.totals.shipping_price)
        .bind(order.totals.tax_price)
        .bind(order.totals.total_price)
        .execute(&mut *tx)
        .await?;

        for (line_number, item) in (1_i32..).zip(items) {
            sqlx::query(
                "INSERT INTO storefront.order_item \
                     (order_id, product_id, line_number, name, slug, image, price, qty) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(line_number)
            .bind(&item.name)
            .bind(&item.slug)
            .bind(&item.image)
            .bind(item.price)
            .bind(qty_column(item.qty)?)
            .execute(&mut *tx)
            .await?;
        }

        let zero = CartTotals::zero();
        let cleared = sqlx::query(
            "UPDATE storefront.cart \
             SET items = '[]'::jsonb, items_price = $2, shipping_price = $3, \
                 tax_price = $4, total_price = $5 \
             WHERE id = $1",
        )
        .bind(cart_id)
        .bind(zero.items_price)
        .bind(zero.shipping_price)
        .bind(zero.tax_price)
        .bind(zero.total_price)
        .execute(&mut *tx)
        .await?;

        if cleared.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(order_id)
    }

    async fn order_detail(&self, id: OrderId) -> Result<Option<OrderDetail>, RepositoryError> {
        let Some(row) = sqlx::query_as::<_, OrderRow>(
            "SELECT o.id, o.user_id, o.shipping_address, o.payment_method, o.items_price, \
                    o.shipping_price, o.tax_price, o.total_price, o.is_paid, o.paid_at, \
                    o.is_delivered, o.delivered_at, o.created_at, \
                    u.name AS user_name, u.email AS user_email \
             FROM storefront.order o \
             JOIN storefront.user u ON u.id = o.user_id \
             WHERE o.id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItemRow>(
            "SELECT order_id, product_id, name, slug, image, price, qty \
             FROM storefront.order_item WHERE order_id = $1 ORDER BY line_number",
        )
        .bind(id)
        .fetch_all(self.pool())
        .await?
        .into_iter()
        .map(OrderItem::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        let payment_method = row.payment_method.parse::<PaymentMethod>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment method in database: {e}"))
        })?;
        let email = Email::parse(&row.user_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Some(OrderDetail {
            order: Order {
                id: row.id,
                user_id: row.user_id,
                shipping_address: row.shipping_address.0,
                payment_method,
                totals: CartTotals {
                    items_price: row.items_price,
                    shipping_price: row.shipping_price,
                    tax_price: row.tax_price,
                    total_price: row.total_price,
                },
                is_paid: row.is_paid,
                paid_at: row.paid_at,
                is_delivered: row.is_delivered,
                delivered_at: row.delivered_at,
                created_at: row.created_at,
            },
            items,
            user: OrderUser {
                name: row.user_name,
                email,
            },
        }))
    }
}
