//! Commerce platform cart and checkout calls.

use async_trait::async_trait;
use mockall::automock;

mod errors;
mod http;

pub(crate) use errors::PlatformError;
pub(crate) use http::HttpCommercePlatform;

/// One requested product and how many of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CartLine {
    pub(crate) product_id: String,
    pub(crate) quantity: u32,
}

impl CartLine {
    pub(crate) fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Hosted cart and checkout operations.
#[automock]
#[async_trait]
pub(crate) trait CommercePlatform: Send + Sync {
    /// Create a cart holding `lines` and return its id.
    async fn create_cart(&self, lines: Vec<CartLine>) -> Result<String, PlatformError>;

    /// Apply a coupon code to an existing cart.
    async fn apply_coupon(&self, cart_id: &str, code: &str) -> Result<(), PlatformError>;

    /// Create a checkout from a cart and return its id.
    async fn create_checkout(&self, cart_id: &str) -> Result<String, PlatformError>;

    /// Resolve the hosted payment page for a checkout.
    async fn checkout_url(&self, checkout_id: &str) -> Result<String, PlatformError>;
}
