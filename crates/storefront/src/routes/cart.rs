//! Cart route handlers.
//!
//! The cart owner comes from [`RequestContext`]: the signed-in user, or the
//! `sessionCartId` cookie for anonymous shoppers. Mutations always answer
//! `200` with an [`ActionResponse`] describing the outcome.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use prostore_core::{CartItemInput, ProductId};

use crate::db::Store;
use crate::error::Result;
use crate::models::{ActionResponse, Cart};
use crate::services::{CommerceError, RequestContext};
use crate::state::AppState;

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    #[serde(alias = "productId")]
    pub product_id: ProductId,
}

/// Current cart, or `null` when none exists yet.
#[instrument(skip(state, ctx))]
pub async fn show<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
) -> Result<Json<Option<Cart>>> {
    match state.carts().get_cart(&ctx).await {
        Ok(cart) => Ok(Json(cart)),
        Err(CommerceError::NoSessionCartId) => Ok(Json(None)),
        Err(err) => Err(err.into()),
    }
}

/// Add one unit of a product.
#[instrument(skip(state, ctx, input))]
pub async fn add<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    Json(input): Json<CartItemInput>,
) -> Json<ActionResponse> {
    Json(state.carts().add_item(&ctx, input).await)
}

/// Remove one unit of a product.
#[instrument(skip(state, ctx))]
pub async fn remove<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    Json(form): Json<RemoveFromCartForm>,
) -> Json<ActionResponse> {
    Json(state.carts().remove_item(&ctx, form.product_id).await)
}
