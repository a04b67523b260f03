//! Product queries.

use prostore_core::ProductId;

use super::{PgStore, ProductRepository, RepositoryError, conflict_on_unique};
use crate::models::{NewProduct, Product};

const PRODUCT_COLUMNS: &str = "id, name, slug, category, brand, description, images, price, \
     stock, rating, num_reviews, is_featured, banner, created_at";

impl ProductRepository for PgStore {
    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(product)
    }

    async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool())
        .await?;

        Ok(product)
    }

    async fn latest_products(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product \
             ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(products)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let created = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO storefront.product \
                 (id, name, slug, category, brand, description, images, price, stock, \
                  is_featured, banner) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(ProductId::generate())
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.category)
        .bind(&product.brand)
        .bind(&product.description)
        .bind(&product.images)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.is_featured)
        .bind(&product.banner)
        .fetch_one(self.pool())
        .await
        .map_err(conflict_on_unique("slug"))?;

        Ok(created)
    }
}
