//! Orders
//!
//! Remote order records, the summaries kept in local order history, and
//! carrier tracking links.

use std::sync::LazyLock;

use jiff::{Timestamp, civil::Date};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const DEFAULT_STATUS: &str = "Placed";
const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_ITEM_NAME: &str = "Product";

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_item_name() -> String {
    DEFAULT_ITEM_NAME.to_string()
}

const fn default_quantity() -> u32 {
    1
}

/// A line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product name
    #[serde(default = "default_item_name")]
    pub name: String,

    /// Units ordered
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Unit price
    #[serde(default)]
    pub price: Decimal,

    /// Image reference
    #[serde(default)]
    pub image: Option<String>,
}

impl OrderItem {
    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Address an order ships to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderAddress {
    /// Recipient
    pub full_name: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Postal code
    pub zip: String,
    /// Country
    pub country: String,
}

/// Order record as returned by the order status lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Checkout session the order was placed under
    pub session_id: String,

    /// When the order was placed
    #[serde(default)]
    pub date: Option<String>,

    /// Fulfilment status
    #[serde(default)]
    pub status: Option<String>,

    /// Ordered lines
    #[serde(default)]
    pub items: Vec<OrderItem>,

    /// Sum of line totals
    #[serde(default)]
    pub subtotal: Option<Decimal>,

    /// Shipping charged
    #[serde(default)]
    pub shipping_cost: Option<Decimal>,

    /// Total charged
    #[serde(default)]
    pub amount: Decimal,

    /// Currency code
    #[serde(default)]
    pub currency: Option<String>,

    /// Destination
    #[serde(default)]
    pub shipping_address: Option<OrderAddress>,

    /// Carrier tracking number
    #[serde(default)]
    pub tracking_number: Option<String>,
}

impl Order {
    /// Status, defaulting to `Placed`.
    #[must_use]
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_STATUS)
    }

    /// Currency code, defaulting to `USD`.
    #[must_use]
    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    /// Subtotal, falling back to the charged amount.
    #[must_use]
    pub fn subtotal_or_amount(&self) -> Decimal {
        self.subtotal.unwrap_or(self.amount)
    }

    /// Carrier tracking link, once the order has a tracking number.
    #[must_use]
    pub fn tracking_url(&self) -> Option<String> {
        self.tracking_number.as_deref().and_then(tracking_url)
    }
}

/// Order history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Checkout session of the order
    pub session_id: String,

    /// When the order was placed
    #[serde(default)]
    pub date: Option<String>,

    /// Fulfilment status
    #[serde(default = "default_status")]
    pub status: String,

    /// Total charged
    #[serde(default)]
    pub amount: Decimal,

    /// Currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Total units across all lines
    #[serde(default)]
    pub item_count: u64,

    /// Name of the first line
    #[serde(default = "default_item_name")]
    pub first_item_name: String,

    /// Image of the first line
    #[serde(default)]
    pub first_item_image: Option<String>,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        let first = order.items.first();

        Self {
            session_id: order.session_id.clone(),
            date: order.date.clone(),
            status: order.status().to_string(),
            amount: order.amount,
            currency: order.currency().to_string(),
            item_count: order
                .items
                .iter()
                .map(|item| u64::from(item.quantity))
                .sum(),
            first_item_name: first.map_or_else(default_item_name, |item| item.name.clone()),
            first_item_image: first
                .and_then(|item| item.image.clone())
                .filter(|image| !image.is_empty()),
        }
    }
}

impl OrderSummary {
    /// First item name, with a count of the remaining units.
    #[must_use]
    pub fn headline(&self) -> String {
        if self.item_count > 1 {
            format!("{} + {} more", self.first_item_name, self.item_count - 1)
        } else {
            self.first_item_name.clone()
        }
    }

    /// Date for display.
    #[must_use]
    pub fn display_date(&self) -> String {
        display_date(self.date.as_deref())
    }
}

/// Format an order date like `Jan 5, 2025`.
///
/// Missing dates render as `N/A`; unparseable ones are shown as given.
#[must_use]
pub fn display_date(date: Option<&str>) -> String {
    let Some(date) = date.filter(|date| !date.trim().is_empty()) else {
        return "N/A".to_string();
    };

    if let Ok(timestamp) = date.parse::<Timestamp>() {
        return timestamp.strftime("%b %-d, %Y").to_string();
    }

    date.parse::<Date>().map_or_else(
        |_| date.to_string(),
        |day| day.strftime("%b %-d, %Y").to_string(),
    )
}

/// Badge class for an order status.
#[must_use]
pub fn status_class(status: &str) -> &'static str {
    match status {
        "Processing" => "status-processing",
        "Shipped" => "status-shipped",
        "Delivered" => "status-delivered",
        "Pending" => "status-pending",
        _ => "status-placed",
    }
}

#[expect(clippy::expect_used, reason = "the pattern is a literal")]
static USPS_TRACKING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+[A-Z]{2}[0-9]+US$").expect("USPS tracking pattern compiles")
});

#[expect(clippy::expect_used, reason = "the pattern is a literal")]
static FEDEX_TRACKING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("FedEx tracking pattern compiles"));

/// Carrier tracking link for a tracking number; USPS when the carrier can't be told.
#[must_use]
pub fn tracking_url(tracking_number: &str) -> Option<String> {
    let number = tracking_number.trim().to_uppercase();

    if number.is_empty() {
        return None;
    }

    let url = if USPS_TRACKING.is_match(&number) {
        format!("https://tools.usps.com/go/TrackConfirmAction?tLabels={number}")
    } else if number.starts_with("1Z") {
        format!("https://www.ups.com/track?tracknum={number}")
    } else if FEDEX_TRACKING.is_match(&number) {
        format!("https://www.fedex.com/fedextrack/?trknbr={number}")
    } else {
        format!("https://tools.usps.com/go/TrackConfirmAction?tLabels={number}")
    };

    Some(url)
}
