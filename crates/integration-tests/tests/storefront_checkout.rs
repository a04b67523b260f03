//! Integration tests for checkout and order access.
//!
//! These tests require:
//! - A migrated and seeded database (`ps-cli migrate`, `ps-cli seed products`)
//! - The storefront server running (cargo run -p prostore-storefront)

use prostore_integration_tests::{
    SEEDED_SLUG, base_url, browser, cart_item, product, sign_up, unique_email,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_protected_paths_require_sign_in() {
    let client = browser();
    let base_url = base_url();

    let page = client
        .post(format!("{base_url}/place-order"))
        .send()
        .await
        .expect("Failed to call /place-order");
    assert!(page.status().is_redirection());
    assert_eq!(
        page.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/sign-in")
    );

    let api = client
        .post(format!("{base_url}/api/user/payment-method"))
        .json(&json!({ "type": "PayPal" }))
        .send()
        .await
        .expect("Failed to call payment method API");
    assert_eq!(api.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_place_order() {
    let client = browser();
    let base_url = base_url();
    let polo = product(&client, SEEDED_SLUG).await;

    sign_up(&client, &unique_email()).await;
    client
        .post(format!("{base_url}/api/cart/add"))
        .json(&cart_item(&polo))
        .send()
        .await
        .expect("Failed to add to cart");

    let early: Value = client
        .post(format!("{base_url}/place-order"))
        .send()
        .await
        .expect("Failed to place order")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(early["success"], false);
    assert_eq!(early["redirectTo"], "/shipping-address");

    let address = json!({
        "full_name": "Test Shopper",
        "street_address": "123 Main St",
        "city": "Springfield",
        "postal_code": "12345",
        "country": "USA",
    });
    for (path, body) in [
        ("/api/user/address", address),
        ("/api/user/payment-method", json!({ "type": "CashOnDelivery" })),
    ] {
        let resp: Value = client
            .post(format!("{base_url}{path}"))
            .json(&body)
            .send()
            .await
            .expect("Failed to update profile")
            .json()
            .await
            .expect("Failed to parse response");
        assert_eq!(resp["success"], true, "{path}: {resp}");
    }

    let placed: Value = client
        .post(format!("{base_url}/place-order"))
        .send()
        .await
        .expect("Failed to place order")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(placed["success"], true);
    let order_path = placed["redirectTo"].as_str().unwrap_or_default().to_owned();
    assert!(order_path.starts_with("/order/"));

    let order: Value = client
        .get(format!("{base_url}{order_path}"))
        .send()
        .await
        .expect("Failed to get order")
        .json()
        .await
        .expect("Failed to parse order");
    assert_eq!(order["orderitems"][0]["slug"], SEEDED_SLUG);
    assert_eq!(order["payment_method"], "CashOnDelivery");

    // Someone else cannot read it
    let stranger = browser();
    sign_up(&stranger, &unique_email()).await;
    let resp = stranger
        .get(format!("{base_url}{order_path}"))
        .send()
        .await
        .expect("Failed to get order");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
