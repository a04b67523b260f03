//! Application state shared across handlers.

use std::sync::Arc;

use prostore_core::PricingRules;

use crate::config::StorefrontConfig;
use crate::db::Store;
use crate::services::{AccountService, AuthService, CartService, OrderService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the store and configuration. It is generic over
/// the [`Store`] so handlers can run against `PostgreSQL` or the in-memory
/// store used by tests.
#[derive(Clone)]
pub struct AppState<S> {
    inner: Arc<AppStateInner<S>>,
}

struct AppStateInner<S> {
    config: StorefrontConfig,
    store: S,
}

impl<S: Store> AppState<S> {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: S) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    /// Shipping and tax rules in effect.
    #[must_use]
    pub fn pricing(&self) -> &PricingRules {
        &self.inner.config.pricing
    }

    #[must_use]
    pub fn carts(&self) -> CartService<'_, S> {
        CartService::new(self.store(), self.pricing())
    }

    #[must_use]
    pub fn orders(&self) -> OrderService<'_, S> {
        OrderService::new(self.store())
    }

    #[must_use]
    pub fn accounts(&self) -> AccountService<'_, S> {
        AccountService::new(self.store())
    }

    #[must_use]
    pub fn auth(&self) -> AuthService<'_, S> {
        AuthService::new(self.store())
    }
}
