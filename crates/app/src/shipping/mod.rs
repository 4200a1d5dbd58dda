//! Shipping Options
//!
//! Rate lookups driven by the checkout address, the displayed options and the
//! selection that gates checkout.

mod negotiator;
mod view;
mod watcher;

pub use negotiator::{SelectRateError, ShippingNegotiator};
pub use view::{CheckoutGate, RateOutcome, ShippingStatus, ShippingView};
pub use watcher::{AddressWatcher, RECALCULATE_DELAY};
