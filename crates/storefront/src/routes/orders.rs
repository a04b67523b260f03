//! Checkout and order route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use prostore_core::OrderId;

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{OrderActionResponse, OrderDetail};
use crate::services::RequestContext;
use crate::state::AppState;

/// Turn the signed-in user's cart into an order.
#[instrument(skip(state, ctx))]
pub async fn place<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
) -> Json<OrderActionResponse> {
    Json(state.orders().create_order(&ctx).await)
}

/// Order detail. Visible to the buyer and to admins.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show<S: Store>(
    State(state): State<AppState<S>>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<OrderDetail>> {
    let not_found = || AppError::NotFound("Order not found".to_owned());

    let id: OrderId = id.parse().map_err(|_| not_found())?;
    let detail = state
        .orders()
        .get_order_by_id(id)
        .await?
        .ok_or_else(not_found)?;

    if detail.order.user_id != user.id && !user.role.is_admin() {
        return Err(AppError::Forbidden(
            "You are not allowed to view this order".to_owned(),
        ));
    }

    Ok(Json(detail))
}
