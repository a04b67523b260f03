//! Commerce error types.

use thiserror::Error;

use prostore_core::ValidationErrors;

use crate::db::RepositoryError;

/// Errors raised by cart, merge and order operations.
///
/// The `Display` text is what ends up in the `message` field of action
/// responses, so it is written for shoppers.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// Neither a signed-in user nor a session cart cookie.
    #[error("Session Cart Id not found")]
    NoSessionCartId,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Item quantity is out of stock")]
    OutOfStock,

    #[error("Cart not found")]
    CartNotFound,

    #[error("Item not found")]
    ItemNotFound,

    #[error("User not authenticated")]
    NotAuthenticated,

    #[error("No shipping address")]
    MissingShippingAddress,

    #[error("No payment method")]
    MissingPaymentMethod,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("User not found")]
    UserNotFound,

    /// Input failed validation; messages are joined with `". "`.
    #[error("{0}")]
    ValidationFailed(#[from] ValidationErrors),

    /// A unique constraint was hit on `field`.
    #[error("{0} already exists")]
    PersistenceConflict(String),

    /// The order transaction did not commit.
    #[error("Order not created")]
    TransactionFailed(#[source] RepositoryError),

    /// Any other storage failure.
    #[error("Something went wrong")]
    Persistence(#[source] RepositoryError),
}

impl CommerceError {
    /// Where the client should go to fix this error, if anywhere.
    #[must_use]
    pub const fn redirect_to(&self) -> Option<&'static str> {
        match self {
            Self::NotAuthenticated => Some("/sign-in"),
            Self::EmptyCart => Some("/cart"),
            Self::MissingShippingAddress => Some("/shipping-address"),
            Self::MissingPaymentMethod => Some("/payment-method"),
            _ => None,
        }
    }

    /// Whether this is a storage failure rather than a shopper mistake.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::TransactionFailed(_) | Self::Persistence(_))
    }
}

impl From<RepositoryError> for CommerceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(field) => Self::PersistenceConflict(field),
            other => Self::Persistence(other),
        }
    }
}
