//! Product catalog service.
//!
//! The catalog is an ordered, append-only list of products. It starts from
//! the six seeded scrap categories and grows as sellers upload listings.
//! Every change is written through to storage under
//! [`keys::PRODUCTS`](crate::storage::keys::PRODUCTS).

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use kabadiwala_core::ProductId;

use crate::models::product::{NewProduct, Product, seed_products};
use crate::storage::{Storage, StorageError, keys};

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The upload form had no product name.
    #[error("product name is required")]
    MissingName,

    /// The price field was not a non-negative number.
    #[error("invalid price '{0}'")]
    InvalidPrice(String),

    /// No more product IDs can be issued.
    #[error("product ID space exhausted")]
    IdsExhausted,

    /// Persisting the catalog failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// The product catalog.
#[derive(Debug)]
pub struct Catalog {
    storage: Storage,
    products: Vec<Product>,
}

impl Catalog {
    /// Load the catalog from storage, seeding it if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the stored catalog cannot be read.
    pub fn load(storage: Storage) -> Result<Self, CatalogError> {
        let products = match storage.read(keys::PRODUCTS)? {
            Some(products) => {
                tracing::debug!(count = products.len(), "Loaded stored catalog");
                products
            }
            None => seed_products(),
        };

        Ok(Self { storage, products })
    }

    /// All products, in display order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Unit price of a product.
    #[must_use]
    pub fn price_of(&self, id: ProductId) -> Option<Decimal> {
        self.get(id).map(|p| p.price)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Validate an uploaded product, append it and persist the catalog.
    ///
    /// The new ID is one past the highest existing ID, so IDs never collide.
    ///
    /// # Errors
    ///
    /// Returns `MissingName` or `InvalidPrice` for bad form input,
    /// `IdsExhausted` if the ID space has run out, or `Storage` if the
    /// catalog could not be saved. On error the catalog is unchanged.
    pub fn add_product(&mut self, new_product: NewProduct) -> Result<Product, CatalogError> {
        let name = new_product.name.trim();
        if name.is_empty() {
            return Err(CatalogError::MissingName);
        }

        let price = parse_price(&new_product.price)?;
        let id = self.next_id()?;
        let description = Some(new_product.description.trim().to_string()).filter(|d| !d.is_empty());

        let product = Product {
            id,
            product_name: name.to_string(),
            price,
            product_image: new_product.image,
            description,
        };

        let mut products = self.products.clone();
        products.push(product.clone());
        self.storage.write(keys::PRODUCTS, &products)?;
        self.products = products;

        tracing::info!(product_id = %id, name, %price, "Product added to catalog");

        Ok(product)
    }

    /// Discard uploaded products and return to the seeded catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the stored catalog cannot be removed.
    pub fn reset(&mut self) -> Result<(), CatalogError> {
        self.storage.remove(keys::PRODUCTS)?;
        self.products = seed_products();
        tracing::info!("Catalog reset to seed products");
        Ok(())
    }

    fn next_id(&self) -> Result<ProductId, CatalogError> {
        match self.products.iter().map(|p| p.id).max() {
            Some(max) => max.next().ok_or(CatalogError::IdsExhausted),
            None => Ok(ProductId::new(1)),
        }
    }
}

/// Highest unit price accepted from the upload form (one crore).
const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Parse a form price: a decimal in `0..=MAX_UNIT_PRICE`, surrounding
/// whitespace allowed.
fn parse_price(raw: &str) -> Result<Decimal, CatalogError> {
    let trimmed = raw.trim();
    let price = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| CatalogError::InvalidPrice(raw.to_string()))?;

    if price.is_sign_negative() || price > MAX_UNIT_PRICE {
        return Err(CatalogError::InvalidPrice(raw.to_string()));
    }

    Ok(price)
}
