//! Agroverse
//!
//! Storefront domain for the Agroverse cacao shop: carts, catalog entries,
//! shipping addresses and rate quotes, checkout form rules, orders and
//! wholesale quote requests.

pub mod address;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod environment;
pub mod money;
pub mod orders;
pub mod quotes;
pub mod shipping;

pub mod prelude;
