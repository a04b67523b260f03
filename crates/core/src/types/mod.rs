//! Core types for ProStore.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod cart;
pub mod email;
pub mod id;
pub mod payment;
pub mod price;
pub mod pricing;
pub mod role;
pub mod validation;

pub use address::ShippingAddress;
pub use cart::{CartItem, CartItemInput};
pub use email::{Email, EmailError};
pub use id::*;
pub use payment::{PaymentMethod, UnknownPaymentMethod};
pub use price::{Price, PriceError};
pub use pricing::{CartTotals, PricingRules, compute_totals};
pub use role::{UnknownRole, UserRole};
pub use validation::ValidationErrors;
