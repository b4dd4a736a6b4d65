//! Product domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kabadiwala_core::ProductId;

/// A purchasable catalog entry.
///
/// Field names are serialized in camelCase (`productName`, `productImage`) to
/// stay compatible with previously stored catalogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub product_name: String,
    /// Unit price.
    pub price: Decimal,
    /// Image reference (asset name, URL or data URL).
    pub product_image: String,
    /// Seller-supplied description. The seeded catalog has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    fn seed(id: i32, name: &str, price: Decimal, image: &str) -> Self {
        Self {
            id: ProductId::new(id),
            product_name: name.to_string(),
            price,
            product_image: image.to_string(),
            description: None,
        }
    }
}

/// The six products every fresh catalog starts with.
#[must_use]
pub fn seed_products() -> Vec<Product> {
    vec![
        Product::seed(1, "Aluminum Metal", Decimal::new(300, 0), "imga.png"),
        Product::seed(2, "Plastic Scrap", Decimal::new(20, 0), "imgb.png"),
        Product::seed(3, "Cardboard Scrap", Decimal::new(18, 0), "imgc.png"),
        Product::seed(4, "Glass Scrap", Decimal::new(25, 0), "imgd.png"),
        Product::seed(5, "Electronic Scrap", Decimal::new(50, 0), "imge.png"),
        Product::seed(6, "Cholthing Scrap", Decimal::new(30, 0), "imgf.png"),
    ]
}

/// A product submitted through the upload form, before it has an ID.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Description shown on the product page.
    pub description: String,
    /// Price as typed into the form.
    pub price: String,
    /// Image reference for the uploaded picture.
    pub image: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_catalog() {
        let products = seed_products();
        assert_eq!(products.len(), 6);
        assert_eq!(products[0].product_name, "Aluminum Metal");
        assert_eq!(products[0].price, Decimal::new(300, 0));
        assert_eq!(products[5].id, ProductId::new(6));
    }

    #[test]
    fn test_reads_stored_catalog_format() {
        let json = r#"{"id": 7, "productName": "Copper Wire", "price": 410.5, "productImage": "blob:abc", "description": "Stripped"}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, ProductId::new(7));
        assert_eq!(product.product_name, "Copper Wire");
        assert_eq!(product.price, Decimal::new(4105, 1));
        assert_eq!(product.description.as_deref(), Some("Stripped"));
    }

    #[test]
    fn test_description_is_optional() {
        let json = r#"{"id": 1, "productName": "Aluminum Metal", "price": 300.0, "productImage": "imga.png"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.description, None);
    }
}
