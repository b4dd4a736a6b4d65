//! Catalog, cart and profile state surviving a restart.
//!
//! Each test writes through the JSON file backend in a temporary directory,
//! drops the application and starts a new one over the same file.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde_json::Value;

use kabadiwala_core::{CartStatus, ProductId};
use kabadiwala_integration_tests::{TempStore, seeded_provider};
use kabadiwala_storefront::models::product::NewProduct;

fn newspapers(price: &str) -> NewProduct {
    NewProduct {
        name: "Old Newspapers".to_string(),
        description: "Bundled, 10 kg".to_string(),
        price: price.to_string(),
        image: "blob:newspapers".to_string(),
    }
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let store = TempStore::new().unwrap();

    let mut app = store.start(seeded_provider()).await.unwrap();
    app.cart_mut().add_to_cart(ProductId::new(1)).unwrap();
    app.cart_mut().add_to_cart(ProductId::new(1)).unwrap();
    app.cart_mut().update_quantity(ProductId::new(3), 5).unwrap();
    drop(app);

    let app = store.start(seeded_provider()).await.unwrap();
    assert_eq!(app.cart().quantity(ProductId::new(1)), 2);
    assert_eq!(app.cart().quantity(ProductId::new(3)), 5);
    assert_eq!(app.cart().item_count(), 7);
    // 2 x 300 + 5 x 18
    assert_eq!(app.cart_total().amount, Decimal::from(690));
}

#[tokio::test]
async fn test_removing_last_unit_clears_line() {
    let store = TempStore::new().unwrap();

    let mut app = store.start(seeded_provider()).await.unwrap();
    app.cart_mut().add_to_cart(ProductId::new(4)).unwrap();
    app.cart_mut().remove_from_cart(ProductId::new(4)).unwrap();
    app.cart_mut().remove_from_cart(ProductId::new(4)).unwrap();
    drop(app);

    let app = store.start(seeded_provider()).await.unwrap();
    assert_eq!(app.cart().quantity(ProductId::new(4)), 0);
    assert!(app.cart().is_empty());
    assert_eq!(app.cart_total().amount, Decimal::ZERO);
}

#[tokio::test]
async fn test_product_ids_stay_unique_across_restarts() {
    let store = TempStore::new().unwrap();

    let mut app = store.start(seeded_provider()).await.unwrap();
    let first = app.add_product(newspapers("120")).unwrap();
    assert_eq!(first.id, ProductId::new(7));
    drop(app);

    let mut app = store.start(seeded_provider()).await.unwrap();
    assert_eq!(app.catalog().len(), 7);
    let second = app.add_product(newspapers("95.50")).unwrap();
    assert_eq!(second.id, ProductId::new(8));

    let ids: HashSet<ProductId> = app.catalog().products().iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), 8);
    assert_eq!(app.catalog().len(), 8);
}

#[tokio::test]
async fn test_uploaded_product_priced_in_cart() {
    let store = TempStore::new().unwrap();

    let mut app = store.start(seeded_provider()).await.unwrap();
    let product = app.add_product(newspapers("95.50")).unwrap();
    app.cart_mut().update_quantity(product.id, 2).unwrap();
    drop(app);

    let app = store.start(seeded_provider()).await.unwrap();
    assert_eq!(app.cart_total().amount, Decimal::new(191, 0));
    assert_eq!(app.cart_total().to_string(), "₹191.00");
}

#[tokio::test]
async fn test_checkout_clears_stored_cart() {
    let store = TempStore::new().unwrap();

    let mut app = store.start(seeded_provider()).await.unwrap();
    app.cart_mut().update_quantity(ProductId::new(5), 3).unwrap();
    let receipt = app.checkout().unwrap();
    assert_eq!(receipt.total.amount, Decimal::from(150));
    assert_eq!(receipt.lines.len(), 1);
    assert_eq!(app.cart().status(), CartStatus::CheckedOut);
    assert!(app.cart_mut().add_to_cart(ProductId::new(5)).is_err());
    drop(app);

    let app = store.start(seeded_provider()).await.unwrap();
    assert!(app.cart().is_empty());
    assert_eq!(app.cart().status(), CartStatus::Shopping);
}

#[tokio::test]
async fn test_empty_cart_cannot_check_out() {
    let store = TempStore::new().unwrap();

    let mut app = store.start(seeded_provider()).await.unwrap();
    assert!(!app.cart().can_checkout(app.catalog()));
    assert!(app.checkout().is_err());
    assert_eq!(app.cart().status(), CartStatus::Shopping);
}

#[tokio::test]
async fn test_profile_fields_survive_restart() {
    let store = TempStore::new().unwrap();

    let app = store.start(seeded_provider()).await.unwrap();
    app.profile().set_phone_number("9876543210").unwrap();
    app.profile().set_address("12 Karol Bagh, New Delhi").unwrap();
    app.profile().set_postal_code("110005").unwrap();
    assert!(app.profile().set_phone_number("98765 43210").is_err());
    drop(app);

    let app = store.start(seeded_provider()).await.unwrap();
    assert_eq!(app.phone_number().unwrap(), "9876543210");
    assert_eq!(app.profile().address().unwrap(), "12 Karol Bagh, New Delhi");
    assert_eq!(app.profile().postal_code().unwrap(), "110005");
    assert!(app.profile().profile_picture().unwrap().is_none());
}

#[tokio::test]
async fn test_storage_file_layout() {
    let store = TempStore::new().unwrap();

    let mut app = store.start(seeded_provider()).await.unwrap();
    app.add_product(newspapers("120")).unwrap();
    app.cart_mut().add_to_cart(ProductId::new(2)).unwrap();
    drop(app);

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let file: Value = serde_json::from_str(&raw).unwrap();

    // Each key holds its value as a JSON-encoded string
    let products: Value = serde_json::from_str(file["products"].as_str().unwrap()).unwrap();
    assert_eq!(products.as_array().unwrap().len(), 7);
    assert_eq!(products[6]["productName"], "Old Newspapers");

    let cart: Value = serde_json::from_str(file["cartItems"].as_str().unwrap()).unwrap();
    assert_eq!(cart["2"], 1);
}
