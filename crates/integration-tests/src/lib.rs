//! Integration tests for ProStore.
//!
//! The tests drive a running storefront over HTTP and are `#[ignore]`d by
//! default.
//!
//! # Running Tests
//!
//! ```bash
//! ps-cli migrate
//! ps-cli seed products
//! cargo run -p prostore-storefront &
//! cargo test -p prostore-integration-tests -- --ignored
//! ```
//!
//! `STOREFRONT_URL` overrides the default `http://localhost:3000`.

use reqwest::{Client, redirect::Policy};
use serde_json::{Value, json};
use uuid::Uuid;

/// A seeded product with stock, used by cart tests.
pub const SEEDED_SLUG: &str = "polo-sporting-stretch-shirt";

/// A seeded product with no stock.
pub const SOLD_OUT_SLUG: &str = "tommy-hilfiger-classic-fit-dress-shirt";

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("STOREFRONT_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A browser-like client: keeps cookies and does not follow redirects.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// An email no other test run has used.
#[must_use]
pub fn unique_email() -> String {
    format!("shopper-{}@example.com", Uuid::new_v4().simple())
}

/// Fetch a product by slug.
///
/// # Panics
///
/// Panics if the request fails or the product is not seeded.
pub async fn product(client: &Client, slug: &str) -> Value {
    client
        .get(format!("{}/api/products/{slug}", base_url()))
        .send()
        .await
        .expect("Failed to fetch product")
        .error_for_status()
        .expect("Product not seeded; run `ps-cli seed products`")
        .json()
        .await
        .expect("Failed to parse product")
}

/// Add-to-cart body for a product as returned by the API.
#[must_use]
pub fn cart_item(product: &Value) -> Value {
    json!({
        "product_id": product["id"],
        "name": product["name"],
        "slug": product["slug"],
        "image": product["images"][0],
        "price": product["price"],
        "qty": 1,
    })
}

/// Register a new account, which also signs the client in.
///
/// # Panics
///
/// Panics if the request fails or registration is rejected.
pub async fn sign_up(client: &Client, email: &str) {
    let resp = client
        .post(format!("{}/sign-up", base_url()))
        .form(&[
            ("name", "Test Shopper"),
            ("email", email),
            ("password", "secret123"),
            ("confirm_password", "secret123"),
        ])
        .send()
        .await
        .expect("Failed to sign up");
    assert!(resp.status().is_success(), "sign-up failed: {}", resp.status());
}
