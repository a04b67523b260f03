//! Cart hand-over at sign-in.
//!
//! When an anonymous shopper signs in or signs up, the cart they built in
//! this browser replaces whatever cart their account held before.

use tracing::instrument;

use prostore_core::{SessionCartId, UserId};

use super::CommerceError;
use crate::db::CartRepository;

/// Bind the session cart to `user_id`, dropping the user's older carts.
///
/// Returns `true` if a cart was handed over. Without a session cookie, or
/// when no cart was ever created for it, nothing changes.
///
/// # Errors
///
/// Returns `CommerceError::Persistence` if the lookup or the transfer fails.
/// A failed transfer leaves every cart as it was.
#[instrument(skip(store))]
pub async fn merge_session_cart<S: CartRepository + Sync>(
    store: &S,
    user_id: UserId,
    session_cart_id: Option<SessionCartId>,
) -> Result<bool, CommerceError> {
    let Some(session_cart_id) = session_cart_id else {
        return Ok(false);
    };
    let Some(cart) = store.cart_by_session(session_cart_id).await? else {
        return Ok(false);
    };

    store.transfer_cart(cart.id, user_id).await?;
    tracing::info!(cart_id = %cart.id, %user_id, "session cart merged into user");
    Ok(true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use prostore_core::{CartItem, CartTotals, Price, PricingRules, ProductId};

    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::NewCart;

    fn line(name: &str, cents: u32) -> CartItem {
        CartItem {
            product_id: ProductId::generate(),
            name: name.to_owned(),
            slug: name.to_lowercase(),
            image: format!("/images/{name}.jpg"),
            price: Price::from_cents(cents),
            qty: 1,
        }
    }

    async fn cart_with(
        store: &MemoryStore,
        session: SessionCartId,
        user_id: Option<UserId>,
        items: Vec<CartItem>,
    ) -> crate::models::Cart {
        let totals = PricingRules::default().compute_totals(&items);
        store
            .create_cart(NewCart {
                user_id,
                session_cart_id: session,
                items,
                totals,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_session_cart_replaces_stale_user_cart() {
        let store = MemoryStore::new();
        let user_id = UserId::generate();
        let session = SessionCartId::generate();
        let a = cart_with(&store, session, None, vec![line("Shirt", 500)]).await;
        cart_with(&store, SessionCartId::generate(), Some(user_id), vec![line("Hat", 900)]).await;

        let merged = merge_session_cart(&store, user_id, Some(session)).await.unwrap();

        assert!(merged);
        let owned: Vec<_> = store
            .carts()
            .into_iter()
            .filter(|c| c.user_id == Some(user_id))
            .collect();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, a.id);
        assert_eq!(owned[0].items, a.items);
        assert_eq!(owned[0].totals, a.totals);
    }

    #[tokio::test]
    async fn test_no_cookie_is_noop() {
        let store = MemoryStore::new();
        let user_id = UserId::generate();
        cart_with(&store, SessionCartId::generate(), Some(user_id), vec![line("Hat", 900)]).await;

        let merged = merge_session_cart(&store, user_id, None).await.unwrap();

        assert!(!merged);
        assert_eq!(store.carts().len(), 1);
    }

    #[tokio::test]
    async fn test_cookie_without_cart_keeps_user_cart() {
        let store = MemoryStore::new();
        let user_id = UserId::generate();
        let existing =
            cart_with(&store, SessionCartId::generate(), Some(user_id), vec![line("Hat", 900)])
                .await;

        let merged = merge_session_cart(&store, user_id, Some(SessionCartId::generate()))
            .await
            .unwrap();

        assert!(!merged);
        assert_eq!(store.carts(), vec![existing]);
    }

    #[tokio::test]
    async fn test_merged_cart_is_not_handed_over_twice() {
        let store = MemoryStore::new();
        let alice = UserId::generate();
        let bob = UserId::generate();
        let session = SessionCartId::generate();
        let cart = cart_with(&store, session, None, vec![line("Shirt", 500)]).await;
        merge_session_cart(&store, alice, Some(session)).await.unwrap();

        // Alice signs out; the browser keeps its cookie.
        assert!(store.cart_by_session(session).await.unwrap().is_none());

        let merged = merge_session_cart(&store, bob, Some(session)).await.unwrap();

        assert!(!merged);
        let carts = store.carts();
        assert_eq!(carts.len(), 1);
        assert_eq!(carts[0].id, cart.id);
        assert_eq!(carts[0].user_id, Some(alice));
    }

    #[tokio::test]
    async fn test_merging_own_cart_again_keeps_it() {
        let store = MemoryStore::new();
        let user_id = UserId::generate();
        let session = SessionCartId::generate();
        let cart = cart_with(&store, session, Some(user_id), Vec::new()).await;

        let merged = merge_session_cart(&store, user_id, Some(session)).await.unwrap();

        assert!(!merged);
        let carts = store.carts();
        assert_eq!(carts.len(), 1);
        assert_eq!(carts[0].id, cart.id);
        assert_eq!(carts[0].totals, CartTotals::zero());
    }
}
