//! Profile updates made during checkout.

use tracing::instrument;

use prostore_core::{PaymentMethod, ShippingAddress, UnknownPaymentMethod, UserId, ValidationErrors};

use super::CommerceError;
use super::cart::action_response;
use crate::db::UserRepository;
use crate::models::ActionResponse;

const UPDATED: &str = "User updated successfully";

/// Account service over a [`UserRepository`].
pub struct AccountService<'a, S> {
    users: &'a S,
}

impl<'a, S: UserRepository + Sync> AccountService<'a, S> {
    #[must_use]
    pub const fn new(users: &'a S) -> Self {
        Self { users }
    }

    /// Validate and save the shipping address used by the next order.
    #[instrument(skip(self, address))]
    pub async fn update_address(&self, user_id: UserId, address: ShippingAddress) -> ActionResponse {
        action_response(self.try_update_address(user_id, address).await)
    }

    /// Save the payment method used by the next order.
    #[instrument(skip(self))]
    pub async fn update_payment_method(&self, user_id: UserId, method: &str) -> ActionResponse {
        action_response(self.try_update_payment_method(user_id, method).await)
    }

    async fn try_update_address(
        &self,
        user_id: UserId,
        address: ShippingAddress,
    ) -> Result<String, CommerceError> {
        self.require_user(user_id).await?;
        let address = address.validate()?;
        self.users.update_user_address(user_id, &address).await?;
        Ok(UPDATED.to_owned())
    }

    async fn try_update_payment_method(
        &self,
        user_id: UserId,
        method: &str,
    ) -> Result<String, CommerceError> {
        self.require_user(user_id).await?;
        let method: PaymentMethod = method
            .parse()
            .map_err(|e: UnknownPaymentMethod| ValidationErrors::from(e.to_string().as_str()))?;
        self.users.update_user_payment_method(user_id, method).await?;
        Ok(UPDATED.to_owned())
    }

    async fn require_user(&self, user_id: UserId) -> Result<(), CommerceError> {
        self.users
            .user_by_id(user_id)
            .await?
            .map(|_| ())
            .ok_or(CommerceError::UserNotFound)
    }
}
