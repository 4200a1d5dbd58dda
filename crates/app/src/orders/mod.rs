//! Orders
//!
//! Post-checkout order lookups and the history kept on this device.

pub mod errors;
mod history;
mod status;

pub use errors::OrderStatusError;
pub use history::{MAX_ORDERS, OrderHistory};
pub use status::OrderStatusLookup;
