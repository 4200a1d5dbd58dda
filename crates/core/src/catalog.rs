//! Catalog

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Sold through the cart.
    #[default]
    Retail,

    /// Priced on request via a quote.
    Wholesale,
}

/// Product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product identifier
    pub product_id: String,

    /// Product name
    pub name: String,

    /// Unit price; zero for wholesale products priced on request
    #[serde(default)]
    pub price: Decimal,

    /// Shipping weight per unit in ounces
    #[serde(default)]
    pub weight: Option<Decimal>,

    /// Image reference
    #[serde(default)]
    pub image: String,

    /// Pass-through price reference for the payment platform
    #[serde(default, rename = "stripePriceId")]
    pub external_price_ref: String,

    /// Product category
    #[serde(default)]
    pub category: Category,

    /// Shipment lot code
    #[serde(default)]
    pub shipment: Option<String>,

    /// Source farm
    #[serde(default)]
    pub farm: Option<String>,
}

/// Product catalog keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: FxHashMap<String, Product>,
}

impl Catalog {
    /// Build a catalog from a list of products.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products
                .into_iter()
                .map(|product| (product.product_id.clone(), product))
                .collect(),
        }
    }

    /// Look up a product.
    #[must_use]
    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.products.get(product_id)
    }

    /// Non-zero shipping weight for a product, if the catalog knows one.
    #[must_use]
    pub fn weight_of(&self, product_id: &str) -> Option<Decimal> {
        self.get(product_id)
            .and_then(|product| product.weight)
            .filter(|weight| *weight > Decimal::ZERO)
    }

    /// Products in the given category.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Product> {
        self.products
            .values()
            .filter(move |product| product.category == category)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
