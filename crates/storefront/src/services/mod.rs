//! Business logic services for storefront.
//!
//! # Services
//!
//! - `identity` - Who owns the cart for this request
//! - `cart` - Cart reads and mutations with price recomputation
//! - `merge` - Session cart hand-over at sign-in
//! - `orders` - Checkout preconditions and order placement
//! - `account` - Shipping address and payment method updates
//! - `auth` - Email/password accounts
//!
//! Services are generic over [`crate::db::Store`] and never see HTTP types.

pub mod account;
pub mod auth;
pub mod cart;
mod error;
pub mod identity;
pub mod merge;
pub mod orders;

pub use account::AccountService;
pub use auth::{AuthError, AuthService, SignInForm, SignUpForm};
pub use cart::CartService;
pub use error::CommerceError;
pub use identity::{OwnerKey, RequestContext};
pub use merge::merge_session_cart;
pub use orders::OrderService;
