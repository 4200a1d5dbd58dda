//! Shipping
//!
//! Package weight and rate quote selection. The package weight formula is a
//! contract shared with the remote rate service, which charges on its own
//! computation: both sides must agree on the constants of a contract version.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;

/// A shipping option returned by the rate service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingRateQuote {
    /// Identifier, unique within one response
    pub id: String,

    /// Carrier and service name
    pub name: String,

    /// Price of the option
    pub amount: Decimal,

    /// Delivery estimate for display
    #[serde(default)]
    pub delivery_days: String,
}

/// Versioned packaging constants agreed with the rate service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackageWeightContract {
    /// 11.5 oz box plus 0.65 oz packaging per unit.
    #[default]
    V1,
}

impl PackageWeightContract {
    /// Empty box weight in ounces.
    #[must_use]
    pub const fn base_box_weight(self) -> Decimal {
        match self {
            Self::V1 => Decimal::from_parts(115, 0, 0, false, 1),
        }
    }

    /// Packaging added per unit shipped, in ounces.
    #[must_use]
    pub const fn per_item_packaging(self) -> Decimal {
        match self {
            Self::V1 => Decimal::from_parts(65, 0, 0, false, 2),
        }
    }

    /// Packaging overhead for the given number of units.
    #[must_use]
    pub fn packaging_weight(self, units: u64) -> Decimal {
        self.base_box_weight() + self.per_item_packaging() * Decimal::from(units)
    }
}

/// Total shipped weight of a cart in ounces: contents plus packaging.
#[must_use]
pub fn package_weight(cart: &Cart, contract: PackageWeightContract) -> Decimal {
    cart.contents_weight() + contract.packaging_weight(cart.item_count())
}

/// Weight as sent on the wire, with two decimal places.
#[must_use]
pub fn format_weight_oz(weight: Decimal) -> String {
    format!(
        "{:.2}",
        weight.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// The cheapest quote; the first one wins a tie.
#[must_use]
pub fn cheapest(quotes: &[ShippingRateQuote]) -> Option<&ShippingRateQuote> {
    quotes.iter().reduce(|best, quote| {
        if quote.amount < best.amount {
            quote
        } else {
            best
        }
    })
}
