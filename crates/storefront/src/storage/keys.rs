//! Storage keys for persisted storefront state.
//!
//! Key names match the ones the storefront has always written, so existing
//! saved state keeps loading.

use std::collections::BTreeMap;

use kabadiwala_core::ProductId;

use super::StorageKey;
use crate::models::product::Product;

/// The full product catalog, in display order.
pub const PRODUCTS: StorageKey<Vec<Product>> = StorageKey::new("products");

/// Cart quantities by product.
pub const CART_ITEMS: StorageKey<BTreeMap<ProductId, u32>> = StorageKey::new("cartItems");

/// Profile phone number (up to 10 digits).
pub const PHONE_NUMBER: StorageKey<String> = StorageKey::new("phoneNumber");

/// Profile street address.
pub const ADDRESS: StorageKey<String> = StorageKey::new("address");

/// Profile postal code.
pub const POSTAL_CODE: StorageKey<String> = StorageKey::new("postalCode");

/// Profile picture reference (URL or data URL).
pub const PROFILE_PICTURE: StorageKey<String> = StorageKey::new("profilePicture");
