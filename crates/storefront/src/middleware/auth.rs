//! Authentication extractors.
//!
//! Provides extractors for the signed-in user and for the full
//! [`RequestContext`] that cart and order services take.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use prostore_core::SessionCartId;

use super::access_guard::session_cart_id_from_headers;
use crate::models::{CurrentUser, session_keys};
use crate::services::RequestContext;

/// Where unauthenticated page requests are sent.
pub const SIGN_IN_PATH: &str = "/sign-in";

/// Extractor that requires a signed-in user.
///
/// If the user is not signed in, page requests are redirected to the sign-in
/// page and `/api/` requests get `401`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but the user is not signed in.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthRejection {
    /// Redirect to sign-in page (for page requests).
    RedirectToSignIn,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl AuthRejection {
    /// Pick the rejection style for a request path.
    #[must_use]
    pub fn for_path(path: &str) -> Self {
        if path.starts_with("/api/") {
            Self::Unauthorized
        } else {
            Self::RedirectToSignIn
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToSignIn => Redirect::to(SIGN_IN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// Read the signed-in user from the session, if there is one.
pub async fn current_user(session: &Session) -> Option<CurrentUser> {
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::Unauthorized)?;

        let user = current_user(&session)
            .await
            .ok_or_else(|| AuthRejection::for_path(parts.uri.path()))?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is signed in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>().cloned() {
            Some(session) => current_user(&session).await,
            None => None,
        };

        Ok(Self(user))
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let OptionalAuth(identity) = OptionalAuth::from_request_parts(parts, state).await?;

        // The access guard puts the (possibly freshly minted) id here.
        let session_cart_id = parts
            .extensions
            .get::<SessionCartId>()
            .copied()
            .or_else(|| session_cart_id_from_headers(&parts.headers));

        Ok(Self::new(identity, session_cart_id))
    }
}

/// Helper to set the current user in the session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (sign-out).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_depends_on_path() {
        assert_eq!(
            AuthRejection::for_path("/api/user/address"),
            AuthRejection::Unauthorized
        );
        assert_eq!(
            AuthRejection::for_path("/place-order"),
            AuthRejection::RedirectToSignIn
        );
    }

    #[test]
    fn test_redirect_points_at_sign_in() {
        let response = AuthRejection::RedirectToSignIn.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").map(|v| v.as_bytes()),
            Some(SIGN_IN_PATH.as_bytes())
        );
    }
}
