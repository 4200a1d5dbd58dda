//! Agroverse prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    address::{AddressFingerprint, DEFAULT_COUNTRY, ShippingAddress},
    cart::{Cart, CartError, CartLine, NewCartLine, SessionId},
    catalog::{Catalog, Category, Product},
    checkout::{CheckoutForm, FieldError, ValidationErrors},
    environment::Environment,
    money::{format_money, format_usd},
    orders::{Order, OrderAddress, OrderItem, OrderSummary, display_date, status_class, tracking_url},
    quotes::{QuoteFieldError, QuoteProduct, QuoteRequest},
    shipping::{
        PackageWeightContract, ShippingRateQuote, cheapest, format_weight_oz, package_weight,
    },
};
