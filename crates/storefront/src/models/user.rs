//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use prostore_core::{Email, PaymentMethod, ShippingAddress, UserId, UserRole};

/// Placeholder name given to accounts created without one.
pub const NO_NAME: &str = "NO_NAME";

/// A storefront user (domain type).
///
/// The password hash is never part of this type; it is only read by the
/// credential lookup used at sign-in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: UserRole,
    pub address: Option<ShippingAddress>,
    pub payment_method: Option<PaymentMethod>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the stored name is still the sign-up placeholder.
    #[must_use]
    pub fn has_placeholder_name(&self) -> bool {
        self.name == NO_NAME
    }
}

/// Fields needed to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: UserRole,
}
