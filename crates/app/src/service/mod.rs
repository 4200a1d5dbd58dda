//! Remote Commerce Service
//!
//! The storefront's scripting endpoint: shipping rates, checkout sessions,
//! order status and wholesale quote requests.

use agroverse::{
    address::ShippingAddress, cart::Cart, checkout::CheckoutForm, environment::Environment,
    orders::Order, quotes::QuoteRequest, shipping::ShippingRateQuote,
};
use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;

pub mod errors;
mod http;

pub use errors::ServiceError;
pub use http::{DEFAULT_TIMEOUT, HttpCommerceService, ServiceConfig};

/// Shipping rate lookup for one package.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRequest {
    /// Backend to route to.
    pub environment: Environment,

    /// Package weight in ounces, packaging included.
    pub weight_oz: Decimal,

    /// Destination.
    pub address: ShippingAddress,
}

/// Checkout session request.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    /// Backend to route to.
    pub environment: Environment,

    /// Cart being purchased.
    pub cart: Cart,

    /// Customer contact and shipping details.
    pub customer: CheckoutForm,

    /// Shipping option chosen by the customer.
    pub selected_rate_id: Option<String>,
}

#[automock]
#[async_trait]
pub trait CommerceService: Send + Sync {
    /// Quote shipping options for a package.
    async fn calculate_shipping_rates(
        &self,
        request: RateRequest,
    ) -> Result<Vec<ShippingRateQuote>, ServiceError>;

    /// Create a hosted checkout session, returning the URL to send the customer to.
    async fn create_checkout_session(&self, request: CheckoutRequest)
    -> Result<String, ServiceError>;

    /// Look up an order by checkout session id.
    async fn get_order_status(&self, session_id: String) -> Result<Option<Order>, ServiceError>;

    /// Send a wholesale quote request.
    async fn submit_quote_request(
        &self,
        environment: Environment,
        request: QuoteRequest,
    ) -> Result<(), ServiceError>;
}
