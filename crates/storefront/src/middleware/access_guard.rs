//! Access guard: protected paths and the session cart cookie.
//!
//! Runs inside the session layer on every request:
//! 1. Requests for protected paths without a signed-in user are rejected
//!    (redirect for pages, `401` for `/api/`).
//! 2. Requests without a usable `sessionCartId` cookie get a new id. The id
//!    is attached to the request for handlers and set on the response.

use std::sync::LazyLock;

use axum::{
    extract::{Request, State},
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use regex::RegexSet;
use tower_sessions::Session;
use tower_sessions::cookie::{Cookie, SameSite};

use prostore_core::SessionCartId;

use super::auth::{AuthRejection, current_user};

/// Name of the anonymous cart cookie.
pub const SESSION_CART_COOKIE: &str = "sessionCartId";

/// Paths that need a signed-in user. Matched anywhere in the path, so
/// `/api/user/...` is covered by `/user/`.
static PROTECTED_PATHS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"/shipping-address",
        r"/payment-method",
        r"/place-order",
        r"/profile",
        r"/user/(.*)",
        r"/order/(.*)",
        r"/admin",
    ])
    .expect("Invalid regex")
});

/// Whether `path` requires a signed-in user.
#[must_use]
pub fn is_protected(path: &str) -> bool {
    PROTECTED_PATHS.is_match(path)
}

/// Cookie attributes for the session cart cookie.
#[derive(Debug, Clone, Copy)]
pub struct SessionCartCookie {
    secure: bool,
}

impl SessionCartCookie {
    #[must_use]
    pub const fn new(secure: bool) -> Self {
        Self { secure }
    }

    fn build(self, id: SessionCartId) -> Cookie<'static> {
        Cookie::build((SESSION_CART_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }
}

/// Read the session cart id from `Cookie` headers.
///
/// A cookie that is not a UUID counts as absent.
#[must_use]
pub fn session_cart_id_from_headers(headers: &HeaderMap) -> Option<SessionCartId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_CART_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
}

/// Middleware enforcing protected paths and minting session cart ids.
///
/// Must run inside `SessionManagerLayer` so the session is available.
pub async fn access_guard(
    State(cookie): State<SessionCartCookie>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    if is_protected(&path) {
        let session = request.extensions().get::<Session>().cloned();
        let signed_in = match session {
            Some(session) => current_user(&session).await.is_some(),
            None => false,
        };
        if !signed_in {
            tracing::debug!(%path, "unauthenticated request for protected path");
            return AuthRejection::for_path(&path).into_response();
        }
    }

    let (session_cart_id, minted) = match session_cart_id_from_headers(request.headers()) {
        Some(id) => (id, false),
        None => (SessionCartId::generate(), true),
    };
    request.extensions_mut().insert(session_cart_id);

    let mut response = next.run(request).await;

    if minted {
        match HeaderValue::from_str(&cookie.build(session_cart_id).to_string()) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "could not encode session cart cookie"),
        }
    }

    response
}
