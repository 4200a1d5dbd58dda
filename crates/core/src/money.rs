//! Money display

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};

fn minor_units(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
}

fn currency(code: &str) -> Option<&'static Currency> {
    match code {
        "USD" => Some(iso::USD),
        "GBP" => Some(iso::GBP),
        "EUR" => Some(iso::EUR),
        _ => None,
    }
}

/// Format an amount in the given ISO currency, e.g. `$1,234.50`.
///
/// Unknown currency codes, and amounts too large for minor units, fall back to
/// `"<amount> <code>"` with two decimals.
#[must_use]
pub fn format_money(amount: Decimal, currency_code: &str) -> String {
    match (currency(currency_code), minor_units(amount)) {
        (Some(currency), Some(minor)) => format!("{}", Money::from_minor(minor, currency)),
        _ => format!(
            "{:.2} {currency_code}",
            amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
    }
}

/// Format an amount in US dollars.
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    format_money(amount, "USD")
}
