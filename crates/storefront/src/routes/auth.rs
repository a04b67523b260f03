//! Authentication route handlers.
//!
//! Sign-in and sign-up put a [`CurrentUser`] in the session and then hand
//! the anonymous cart of this browser over to the user.

use axum::{Form, Json, extract::State};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::Store;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{ActionResponse, CurrentUser, User};
use crate::services::{RequestContext, SignInForm, SignUpForm, merge_session_cart};
use crate::state::AppState;

/// Register and sign in.
#[instrument(skip_all)]
pub async fn sign_up<S: Store>(
    State(state): State<AppState<S>>,
    session: Session,
    ctx: RequestContext,
    Form(form): Form<SignUpForm>,
) -> Result<Json<ActionResponse>> {
    let user = state.auth().sign_up(&form).await?;
    start_session(&state, &session, &user, &ctx).await?;
    Ok(Json(ActionResponse::ok("User registered successfully")))
}

/// Sign in with email and password.
#[instrument(skip_all)]
pub async fn sign_in<S: Store>(
    State(state): State<AppState<S>>,
    session: Session,
    ctx: RequestContext,
    Form(form): Form<SignInForm>,
) -> Result<Json<ActionResponse>> {
    let user = state.auth().sign_in(&form).await?;
    start_session(&state, &session, &user, &ctx).await?;
    Ok(Json(ActionResponse::ok("Signed in successfully")))
}

/// Sign out. The session cart cookie stays, so the browser keeps an
/// anonymous identity.
#[instrument(skip_all)]
pub async fn sign_out(session: Session) -> Result<Json<ActionResponse>> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Json(ActionResponse::ok("Signed out successfully")))
}

async fn start_session<S: Store>(
    state: &AppState<S>,
    session: &Session,
    user: &User,
    ctx: &RequestContext,
) -> Result<()> {
    set_current_user(session, &CurrentUser::from(user)).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    // Sign-in stands even if the cart could not be handed over.
    if let Err(err) = merge_session_cart(state.store(), user.id, ctx.session_cart_id).await {
        tracing::error!(error = ?err, user_id = %user.id, "session cart merge failed");
    }

    Ok(())
}
