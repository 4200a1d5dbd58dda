//! Observable shipping state.

use agroverse::shipping::ShippingRateQuote;

pub(crate) const NEEDS_ADDRESS: &str = "Enter your complete address above to see shipping options";
pub(crate) const NO_OPTIONS: &str = "No shipping options available";
pub(crate) const CALCULATION_FAILED: &str = "Error calculating shipping. Please try again.";
pub(crate) const NOT_CONFIGURED: &str = "Shipping calculator not configured";
pub(crate) const SELECT_OPTION: &str = "Please select a shipping option above to continue";

/// What the shipping options area shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ShippingStatus {
    /// Nothing requested yet, or the address changed since the last lookup.
    #[default]
    Idle,

    /// Cart is empty or the address is incomplete.
    NeedsAddress,

    /// A lookup is in flight.
    Calculating,

    /// Options are available to choose from.
    Ready,

    /// The service returned no options.
    Unavailable,

    /// The lookup failed; carries the message to show.
    Failed(String),

    /// No service endpoint is configured.
    NotConfigured,
}

impl ShippingStatus {
    /// Text to show in place of the options, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Idle | Self::Ready => None,
            Self::NeedsAddress => Some(NEEDS_ADDRESS),
            Self::Calculating => Some("Calculating shipping..."),
            Self::Unavailable => Some(NO_OPTIONS),
            Self::Failed(message) => Some(message),
            Self::NotConfigured => Some(NOT_CONFIGURED),
        }
    }
}

/// Whether checkout may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutGate {
    /// No shipping option is selected.
    #[default]
    Locked,

    /// A shipping option is selected.
    Unlocked,
}

impl CheckoutGate {
    /// Note shown under the submit button while locked.
    #[must_use]
    pub fn note(self) -> Option<&'static str> {
        match self {
            Self::Locked => Some(SELECT_OPTION),
            Self::Unlocked => None,
        }
    }

    /// Whether the submit button is enabled.
    #[must_use]
    pub fn is_unlocked(self) -> bool {
        self == Self::Unlocked
    }
}

/// Snapshot of the shipping options area.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShippingView {
    pub status: ShippingStatus,

    /// Options on display, in service order.
    pub quotes: Vec<ShippingRateQuote>,

    /// The chosen option.
    pub selected: Option<ShippingRateQuote>,

    pub gate: CheckoutGate,
}

impl ShippingView {
    pub(crate) fn showing(
        status: ShippingStatus,
        quotes: Vec<ShippingRateQuote>,
        selected: Option<ShippingRateQuote>,
    ) -> Self {
        let gate = if selected.is_some() {
            CheckoutGate::Unlocked
        } else {
            CheckoutGate::Locked
        };

        Self {
            status,
            quotes,
            selected,
            gate,
        }
    }

    pub(crate) fn message(status: ShippingStatus) -> Self {
        Self::showing(status, Vec::new(), None)
    }
}

/// How a rate calculation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateOutcome {
    /// Fresh quotes are on display.
    Quoted,

    /// Quotes for the same address were redisplayed without a lookup.
    Cached,

    /// A newer calculation or an address change took over; the result was dropped.
    Superseded,

    /// Cart empty or address incomplete.
    NeedsAddress,

    /// The service had no options.
    Unavailable,

    /// The lookup failed.
    Failed,

    /// No service endpoint is configured.
    NotConfigured,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_follows_selection() {
        assert_eq!(ShippingView::message(ShippingStatus::NeedsAddress).gate, CheckoutGate::Locked);
        assert_eq!(
            CheckoutGate::Locked.note(),
            Some("Please select a shipping option above to continue")
        );
        assert_eq!(CheckoutGate::Unlocked.note(), None);
    }

    #[test]
    fn status_messages() {
        assert_eq!(
            ShippingStatus::NeedsAddress.message(),
            Some("Enter your complete address above to see shipping options")
        );
        assert_eq!(
            ShippingStatus::Failed("Invalid ZIP".to_string()).message(),
            Some("Invalid ZIP")
        );
        assert_eq!(ShippingStatus::Ready.message(), None);
    }
}
