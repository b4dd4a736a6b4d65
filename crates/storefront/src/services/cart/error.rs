//! Cart error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart has been checked out and no longer accepts changes.
    #[error("cart is already checked out")]
    CheckedOut,

    /// Checkout needs a positive total.
    #[error("cart is empty")]
    Empty,

    /// Persisting the cart failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
