//! Account route handlers for the checkout steps.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use prostore_core::ShippingAddress;

use crate::db::Store;
use crate::middleware::RequireAuth;
use crate::models::ActionResponse;
use crate::state::AppState;

/// Payment method request body.
#[derive(Debug, Deserialize)]
pub struct PaymentMethodForm {
    #[serde(rename = "type")]
    pub method: String,
}

/// Save the signed-in user's shipping address.
#[instrument(skip(state, user, address), fields(user_id = %user.id))]
pub async fn update_address<S: Store>(
    State(state): State<AppState<S>>,
    RequireAuth(user): RequireAuth,
    Json(address): Json<ShippingAddress>,
) -> Json<ActionResponse> {
    Json(state.accounts().update_address(user.id, address).await)
}

/// Save the signed-in user's payment method.
#[instrument(skip(state, user, form), fields(user_id = %user.id))]
pub async fn update_payment_method<S: Store>(
    State(state): State<AppState<S>>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<PaymentMethodForm>,
) -> Json<ActionResponse> {
    Json(
        state
            .accounts()
            .update_payment_method(user.id, &form.method)
            .await,
    )
}
