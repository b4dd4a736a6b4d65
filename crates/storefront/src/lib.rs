//! Kabadiwala.com storefront library.
//!
//! The state core behind the storefront screens: the product catalog, the
//! shopping cart, the session store brokering the identity service, and the
//! locally stored profile fields. Screens render from these stores and call
//! their operations; nothing here draws UI.
//!
//! Start with [`state::App::bootstrap`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod telemetry;
