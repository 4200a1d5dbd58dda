//! Cart store errors.

use agroverse::cart::CartError;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum CartStoreError {
    #[error("invalid cart item")]
    InvalidItem(#[source] CartError),

    #[error("product {0} is not in the cart")]
    NotInCart(String),

    #[error("failed to save cart")]
    Storage(#[from] StorageError),
}

impl From<CartError> for CartStoreError {
    fn from(error: CartError) -> Self {
        match error {
            CartError::NotInCart(product_id) => Self::NotInCart(product_id),
            other => Self::InvalidItem(other),
        }
    }
}

impl CartStoreError {
    /// Message safe to show to a shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidItem(error) => format!("Could not add item: {error}"),
            Self::NotInCart(_) => "That item is no longer in your cart".to_string(),
            Self::Storage(_) => "Your cart could not be saved".to_string(),
        }
    }
}
