//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, error capture)
//! 2. `TraceLayer` (request span)
//! 3. Request ID
//! 4. Session layer (tower-sessions)
//! 5. Access guard (protected paths, session cart cookie)
//! 6. Rate limiting on the auth and API routers (governor)

pub mod access_guard;
pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod session;

pub use access_guard::{SESSION_CART_COOKIE, SessionCartCookie, access_guard};
pub use auth::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
pub use rate_limit::{api_rate_limiter, auth_rate_limiter};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
