//! Domain models for storefront.
//!
//! These types are what services and handlers pass around. Row types used to
//! talk to `PostgreSQL` stay private to the `db` module.

pub mod cart;
pub mod order;
pub mod product;
pub mod response;
pub mod session;
pub mod user;

pub use cart::{Cart, NewCart};
pub use order::{NewOrder, Order, OrderDetail, OrderItem, OrderUser};
pub use product::{NewProduct, Product};
pub use response::{ActionResponse, OrderActionResponse};
pub use session::{CurrentUser, keys as session_keys};
pub use user::{NO_NAME, NewUser, User};
