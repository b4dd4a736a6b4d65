//! Shopping cart store.
//!
//! Tracks how many units of each product the shopper wants and derives the
//! payable total from catalog prices. A quantity of zero means the product is
//! not in the cart; quantities never go negative.
//!
//! # States
//!
//! ```text
//! Shopping --checkout (total > 0)--> CheckedOut --start_new_cart--> Shopping
//! ```
//!
//! Checkout is a placeholder transition: no payment is taken and no order is
//! recorded anywhere. It snapshots the cart into a [`CheckoutReceipt`] and
//! empties it.

mod error;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use kabadiwala_core::{CartStatus, CurrencyCode, Price, ProductId};

pub use error::CartError;

use crate::error::add_breadcrumb;
use crate::models::product::Product;
use crate::services::catalog::Catalog;
use crate::storage::{Storage, keys};

/// One cart line, resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// The product.
    pub product: Product,
    /// Units wanted (always > 0).
    pub quantity: u32,
    /// `quantity × price`.
    pub line_total: Decimal,
}

/// What the shopper saw at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    /// Lines at the moment of checkout, in catalog order.
    pub lines: Vec<CartLine>,
    /// Sum of line totals.
    pub total: Price,
    /// When checkout happened.
    pub placed_at: DateTime<Utc>,
}

/// The shopping cart.
#[derive(Debug)]
pub struct CartStore {
    storage: Storage,
    quantities: BTreeMap<ProductId, u32>,
    status: CartStatus,
}

impl CartStore {
    /// Restore the cart from storage. A restored cart is always `Shopping`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if stored quantities cannot be read.
    pub fn load(storage: Storage) -> Result<Self, CartError> {
        let mut quantities = storage.read(keys::CART_ITEMS)?.unwrap_or_default();
        quantities.retain(|_, quantity| *quantity > 0);

        Ok(Self {
            storage,
            quantities,
            status: CartStatus::Shopping,
        })
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn status(&self) -> CartStatus {
        self.status
    }

    /// Units of `product_id` in the cart (0 when absent).
    #[must_use]
    pub fn quantity(&self, product_id: ProductId) -> u32 {
        self.quantities.get(&product_id).copied().unwrap_or(0)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.quantities.values().map(|&q| u64::from(q)).sum()
    }

    /// Adjust the quantity of `product_id` by `delta`.
    ///
    /// The result is clamped to `0..=u32::MAX`; over-removal simply empties
    /// the line. Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns `CheckedOut` after checkout, or `Storage` if the cart could not
    /// be saved (the quantity is then left unchanged).
    pub fn set_quantity(&mut self, product_id: ProductId, delta: i64) -> Result<u32, CartError> {
        let target = i64::from(self.quantity(product_id)).saturating_add(delta);
        self.write_quantity(product_id, target)
    }

    /// Add one unit.
    ///
    /// # Errors
    ///
    /// See [`set_quantity`](Self::set_quantity).
    pub fn add_to_cart(&mut self, product_id: ProductId) -> Result<u32, CartError> {
        self.set_quantity(product_id, 1)
    }

    /// Remove one unit.
    ///
    /// # Errors
    ///
    /// See [`set_quantity`](Self::set_quantity).
    pub fn remove_from_cart(&mut self, product_id: ProductId) -> Result<u32, CartError> {
        self.set_quantity(product_id, -1)
    }

    /// Set the quantity outright (e.g. from a quantity input), clamped at 0.
    ///
    /// # Errors
    ///
    /// See [`set_quantity`](Self::set_quantity).
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> Result<u32, CartError> {
        self.write_quantity(product_id, quantity)
    }

    /// Sum of `quantity × price` over all lines.
    ///
    /// Lines whose product is missing from `catalog` contribute nothing.
    /// A sum beyond the decimal range saturates at `Decimal::MAX`.
    #[must_use]
    pub fn total(&self, catalog: &Catalog) -> Decimal {
        self.quantities
            .iter()
            .filter_map(|(&id, &quantity)| match catalog.price_of(id) {
                Some(price) => Some(line_total(price, quantity)),
                None => {
                    tracing::warn!(product_id = %id, "Cart line references unknown product");
                    None
                }
            })
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Cart lines in catalog order, skipping products the catalog lacks.
    #[must_use]
    pub fn lines(&self, catalog: &Catalog) -> Vec<CartLine> {
        catalog
            .products()
            .iter()
            .filter_map(|product| {
                let quantity = self.quantity(product.id);
                (quantity > 0).then(|| CartLine {
                    product: product.clone(),
                    quantity,
                    line_total: line_total(product.price, quantity),
                })
            })
            .collect()
    }

    /// Whether checkout is currently allowed.
    #[must_use]
    pub fn can_checkout(&self, catalog: &Catalog) -> bool {
        self.status == CartStatus::Shopping && self.total(catalog) > Decimal::ZERO
    }

    /// Complete the (placeholder) checkout.
    ///
    /// Snapshots the cart, empties it and moves to `CheckedOut`.
    ///
    /// # Errors
    ///
    /// Returns `CheckedOut` if already checked out, `Empty` if the total is
    /// not positive, or `Storage` if the emptied cart could not be saved.
    pub fn checkout(&mut self, catalog: &Catalog) -> Result<CheckoutReceipt, CartError> {
        if self.status == CartStatus::CheckedOut {
            return Err(CartError::CheckedOut);
        }

        let total = self.total(catalog);
        if total <= Decimal::ZERO {
            return Err(CartError::Empty);
        }

        let receipt = CheckoutReceipt {
            lines: self.lines(catalog),
            total: Price::new(total, CurrencyCode::default()),
            placed_at: Utc::now(),
        };

        self.storage.remove(keys::CART_ITEMS)?;
        self.quantities.clear();
        self.status = CartStatus::CheckedOut;

        let total_str = receipt.total.to_string();
        add_breadcrumb("cart", "Checkout completed", Some(&[("total", total_str.as_str())]));
        tracing::info!(total = %receipt.total, lines = receipt.lines.len(), "Checkout completed");

        Ok(receipt)
    }

    /// Begin a fresh, empty cart in the `Shopping` state.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if stored quantities cannot be cleared.
    pub fn start_new_cart(&mut self) -> Result<(), CartError> {
        self.storage.remove(keys::CART_ITEMS)?;
        self.quantities.clear();
        self.status = CartStatus::Shopping;
        Ok(())
    }

    fn write_quantity(&mut self, product_id: ProductId, target: i64) -> Result<u32, CartError> {
        if self.status == CartStatus::CheckedOut {
            return Err(CartError::CheckedOut);
        }

        let quantity = u32::try_from(target.max(0)).unwrap_or(u32::MAX);

        let mut quantities = self.quantities.clone();
        if quantity == 0 {
            quantities.remove(&product_id);
        } else {
            quantities.insert(product_id, quantity);
        }

        self.storage.write(keys::CART_ITEMS, &quantities)?;
        self.quantities = quantities;

        tracing::debug!(product_id = %product_id, quantity, "Cart quantity updated");
        Ok(quantity)
    }
}

/// `quantity × price`, saturating at `Decimal::MAX`.
fn line_total(price: Decimal, quantity: u32) -> Decimal {
    price.saturating_mul(Decimal::from(quantity))
}
