//! Kabadiwala.com storefront - startup check.
//!
//! Loads configuration, restores persisted state and asks the identity
//! service for the current session, then logs what a screen would render.
//! Exits non-zero if configuration or storage is unusable.

#![cfg_attr(not(test), forbid(unsafe_code))]

use kabadiwala_storefront::config::StorefrontConfig;
use kabadiwala_storefront::error::AppError;
use kabadiwala_storefront::state::App;
use kabadiwala_storefront::telemetry;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env()?;
    let _sentry_guard = telemetry::init(&config);

    let app = App::bootstrap(&config).await?;

    for product in app.catalog().products() {
        tracing::info!(
            product_id = %product.id,
            name = %product.product_name,
            price = %product.price,
            in_cart = app.cart().quantity(product.id),
            "Product"
        );
    }

    tracing::info!(
        greeting = %app.greeting(),
        cart_status = %app.cart().status(),
        cart_items = app.cart().item_count(),
        cart_total = %app.cart_total(),
        "Session restored"
    );

    Ok(())
}
