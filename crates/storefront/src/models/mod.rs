//! Domain models for the storefront.
//!
//! - [`product`] - Catalog products and the upload form's new-product input
//! - [`session`] - Signed-in identity and the session state published to observers

pub mod product;
pub mod session;
