//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `catalog` - Product list, seeding and admin product creation
//! - `cart` - Per-product quantities, totals and checkout
//! - `session` - Login, registration and the observable session state
//! - `profile` - Locally stored profile fields and the greeting

pub mod cart;
pub mod catalog;
pub mod profile;
pub mod session;
