//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Liveness check
//! GET  /health/ready             - Readiness check (store reachable)
//!
//! # Catalog
//! GET  /api/products/latest      - Newest products
//! GET  /api/products/{slug}      - Product detail
//!
//! # Cart
//! GET  /api/cart                 - Current cart (or null)
//! POST /api/cart/add             - Add a line, or one more unit
//! POST /api/cart/remove          - Remove one unit
//!
//! # Checkout (requires auth)
//! POST /api/user/address         - Save shipping address
//! POST /api/user/payment-method  - Save payment method
//! POST /place-order              - Turn the cart into an order
//! GET  /order/{id}               - Order detail
//!
//! # Auth
//! POST /sign-up                  - Register and sign in
//! POST /sign-in                  - Sign in
//! POST /sign-out                 - Sign out
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::db::Store;
use crate::middleware::{
    SessionCartCookie, access_guard, api_rate_limiter, auth_rate_limiter, request_id_middleware,
};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/sign-up", post(auth::sign_up::<S>))
        .route("/sign-in", post(auth::sign_in::<S>))
        .route("/sign-out", post(auth::sign_out))
        .layer(auth_rate_limiter())
}

/// Create the JSON API router (mounted at `/api`).
pub fn api_routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/products/latest", get(products::latest::<S>))
        .route("/products/{slug}", get(products::show::<S>))
        .route("/cart", get(cart::show::<S>))
        .route("/cart/add", post(cart::add::<S>))
        .route("/cart/remove", post(cart::remove::<S>))
        .route("/user/address", post(account::update_address::<S>))
        .route(
            "/user/payment-method",
            post(account::update_payment_method::<S>),
        )
        .layer(api_rate_limiter())
}

/// Create the checkout routes router.
pub fn order_routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/place-order", post(orders::place::<S>))
        .route("/order/{id}", get(orders::show::<S>))
}

/// Create all storefront routes.
pub fn routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .nest("/api", api_routes::<S>())
        .merge(order_routes::<S>())
        .merge(auth_routes::<S>())
}

/// Build the application with its middleware stack.
///
/// Health checks sit outside the session layer and the access guard.
pub fn app<S, T>(state: AppState<S>, session_layer: SessionManagerLayer<T>) -> Router
where
    S: Store,
    T: SessionStore + Clone,
{
    let cookie = SessionCartCookie::new(state.config().is_secure());

    Router::new()
        .merge(routes::<S>())
        .layer(from_fn_with_state(cookie, access_guard))
        .layer(session_layer)
        .route("/health", get(health))
        .route("/health/ready", get(readiness::<S>))
        .with_state(state)
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness<S: Store>(State(state): State<AppState<S>>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::warn!(error = %err, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
