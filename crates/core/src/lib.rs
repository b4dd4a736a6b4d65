//! Kabadiwala Core - Shared types library.
//!
//! This crate provides the types shared by the storefront state core and its
//! integration tests:
//! - `storefront` - Catalog, cart, session and profile stores
//! - `integration-tests` - End-to-end flows against in-process and live
//!   identity services
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails,
//!   credentials and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
