//! Identity resolution for cart ownership.
//!
//! Handlers never read cookies or the session themselves. The
//! [`RequestContext`] extractor gathers both and cart code asks
//! [`RequestContext::owner`] who the cart belongs to.

use prostore_core::{SessionCartId, UserId};

use super::CommerceError;
use crate::models::CurrentUser;

/// Who is making the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Signed-in user, if any.
    pub identity: Option<CurrentUser>,
    /// Value of the `sessionCartId` cookie, if present and well-formed.
    pub session_cart_id: Option<SessionCartId>,
}

/// The key a cart is looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKey {
    User(UserId),
    Session(SessionCartId),
}

impl RequestContext {
    #[must_use]
    pub const fn new(identity: Option<CurrentUser>, session_cart_id: Option<SessionCartId>) -> Self {
        Self {
            identity,
            session_cart_id,
        }
    }

    /// Id of the signed-in user.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.identity.as_ref().map(|user| user.id)
    }

    /// Resolve the cart owner: the user when signed in, else the session.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NoSessionCartId` when neither is present.
    pub fn owner(&self) -> Result<OwnerKey, CommerceError> {
        match (&self.identity, self.session_cart_id) {
            (Some(user), _) => Ok(OwnerKey::User(user.id)),
            (None, Some(session)) => Ok(OwnerKey::Session(session)),
            (None, None) => Err(CommerceError::NoSessionCartId),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use prostore_core::{Email, UserRole};

    use super::*;

    fn user() -> CurrentUser {
        CurrentUser {
            id: UserId::generate(),
            name: "Jane".to_owned(),
            email: Email::parse("jane@example.com").unwrap(),
            role: UserRole::User,
        }
    }

    #[test]
    fn test_signed_in_user_wins_over_session() {
        let user = user();
        let ctx = RequestContext::new(Some(user.clone()), Some(SessionCartId::generate()));
        assert_eq!(ctx.owner().unwrap(), OwnerKey::User(user.id));
    }

    #[test]
    fn test_anonymous_uses_session() {
        let session = SessionCartId::generate();
        let ctx = RequestContext::new(None, Some(session));
        assert_eq!(ctx.owner().unwrap(), OwnerKey::Session(session));
    }

    #[test]
    fn test_signed_in_without_cookie_still_resolves() {
        let user = user();
        let ctx = RequestContext::new(Some(user.clone()), None);
        assert_eq!(ctx.owner().unwrap(), OwnerKey::User(user.id));
    }

    #[test]
    fn test_nothing_to_resolve() {
        let ctx = RequestContext::default();
        assert!(matches!(ctx.owner(), Err(CommerceError::NoSessionCartId)));
    }
}
