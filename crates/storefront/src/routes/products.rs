//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// Newest products, as many as `LATEST_PRODUCTS_LIMIT`.
#[instrument(skip(state))]
pub async fn latest<S: Store>(State(state): State<AppState<S>>) -> Result<Json<Vec<Product>>> {
    let limit = state.config().latest_products_limit;
    let products = state.store().latest_products(limit).await?;
    Ok(Json(products))
}

/// Product detail by slug.
#[instrument(skip(state))]
pub async fn show<S: Store>(
    State(state): State<AppState<S>>,
    Path(slug): Path<String>,
) -> Result<Json<Product>> {
    state
        .store()
        .product_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))
}
