//! Checkout
//!
//! Form validation, the checkout session call and the hand-off to the
//! payment page.

pub mod errors;
mod navigator;
mod orchestrator;

pub use errors::CheckoutError;
pub use navigator::{MockNavigator, Navigator, PrintNavigator};
pub use orchestrator::{CheckoutOrchestrator, CheckoutPhase, CheckoutView, FormControls};
