//! Cart

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::Catalog;

/// Errors raised by cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The line has no product identifier.
    #[error("product id is required")]
    MissingProductId,

    /// The line has no display name.
    #[error("product name is required")]
    MissingName,

    /// The unit price is zero or negative.
    #[error("product price must be greater than zero")]
    InvalidPrice,

    /// No line exists for the given product.
    #[error("product {0} is not in the cart")]
    NotInCart(String),
}

/// Opaque cart session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh session identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("cart_{}", Uuid::now_v7().simple()))
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// A single product line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Catalog product identifier; unique within a cart.
    pub product_id: String,

    /// Display name.
    pub name: String,

    /// Unit price.
    pub price: Decimal,

    /// Quantity, never zero once persisted.
    pub quantity: u32,

    /// Image reference.
    #[serde(default)]
    pub image: String,

    /// Shipping weight per unit in ounces; zero until reconciled.
    #[serde(default)]
    pub weight: Decimal,

    /// Pass-through price reference for the payment platform.
    #[serde(default, rename = "stripePriceId")]
    pub external_price_ref: String,
}

impl CartLine {
    /// Price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Weight multiplied by quantity.
    #[must_use]
    pub fn line_weight(&self) -> Decimal {
        self.weight * Decimal::from(self.quantity)
    }

    /// Whether this line still needs a weight from the catalog.
    #[must_use]
    pub fn needs_weight(&self) -> bool {
        self.weight.is_zero()
    }
}

/// Data for adding a product to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLine {
    /// Catalog product identifier.
    pub product_id: String,

    /// Display name.
    pub name: String,

    /// Unit price; must be positive.
    pub price: Decimal,

    /// Units to add.
    pub quantity: u32,

    /// Image reference.
    pub image: String,

    /// Shipping weight per unit in ounces, zero when unknown.
    pub weight: Decimal,

    /// Pass-through price reference for the payment platform.
    pub external_price_ref: String,
}

impl NewCartLine {
    /// A single unit of a product with no image, weight or external reference.
    pub fn new(product_id: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            price,
            quantity: 1,
            image: String::new(),
            weight: Decimal::ZERO,
            external_price_ref: String::new(),
        }
    }

    /// Set the number of units, at least one.
    #[must_use]
    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    /// Set the image reference.
    #[must_use]
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the per-unit weight; negative weights count as unknown.
    #[must_use]
    pub fn weight(mut self, weight: Decimal) -> Self {
        self.weight = weight.max(Decimal::ZERO);
        self
    }

    #[must_use]
    pub fn external_price_ref(mut self, reference: impl Into<String>) -> Self {
        self.external_price_ref = reference.into();
        self
    }

    fn validate(&self) -> Result<(), CartError> {
        if self.product_id.trim().is_empty() {
            return Err(CartError::MissingProductId);
        }

        if self.name.trim().is_empty() {
            return Err(CartError::MissingName);
        }

        if self.price <= Decimal::ZERO {
            return Err(CartError::InvalidPrice);
        }

        Ok(())
    }
}

/// Cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Session identifier, stable until the cart is cleared.
    pub session_id: SessionId,

    /// Lines in insertion order.
    #[serde(default)]
    pub items: Vec<CartLine>,

    /// When the cart was created.
    pub created_at: Timestamp,

    /// When the cart was last persisted.
    pub updated_at: Timestamp,
}

impl Cart {
    /// Create an empty cart with a fresh session.
    #[must_use]
    pub fn empty(now: Timestamp) -> Self {
        Self {
            session_id: SessionId::generate(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Drop lines that could never have been persisted legitimately.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let mut seen = FxHashSet::default();

        self.items
            .retain(|line| line.quantity > 0 && seen.insert(line.product_id.clone()));

        self
    }

    /// Find the line for a product.
    #[must_use]
    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.items.iter().find(|line| line.product_id == product_id)
    }

    /// Add a product, merging with an existing line for the same product.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` when the product id, name or price is missing.
    pub fn add(&mut self, new: NewCartLine) -> Result<(), CartError> {
        new.validate()?;

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.product_id == new.product_id)
        {
            line.quantity = line.quantity.saturating_add(new.quantity);

            if !new.weight.is_zero() {
                line.weight = new.weight;
            }

            return Ok(());
        }

        self.items.push(CartLine {
            product_id: new.product_id,
            name: new.name,
            price: new.price,
            quantity: new.quantity.max(1),
            image: new.image,
            weight: new.weight,
            external_price_ref: new.external_price_ref,
        });

        Ok(())
    }

    /// Remove the line for a product. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.items.len();

        self.items.retain(|line| line.product_id != product_id);

        self.items.len() != before
    }

    /// Set the quantity of a line; zero or negative removes it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotInCart` when setting a positive quantity on a
    /// product that has no line.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            self.remove(product_id);

            return Ok(());
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        let line = self
            .items
            .iter_mut()
            .find(|line| line.product_id == product_id)
            .ok_or_else(|| CartError::NotInCart(product_id.to_string()))?;

        line.quantity = quantity;

        Ok(())
    }

    /// Fill missing line weights from the catalog. Returns whether anything changed.
    pub fn backfill_weights(&mut self, catalog: &Catalog) -> bool {
        let mut changed = false;

        for line in self.items.iter_mut().filter(|line| line.needs_weight()) {
            if let Some(weight) = catalog.weight_of(&line.product_id) {
                line.weight = weight;
                changed = true;
            }
        }

        changed
    }

    /// Whether any line still has no weight.
    #[must_use]
    pub fn has_missing_weights(&self) -> bool {
        self.items.iter().any(CartLine::needs_weight)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of price × quantity across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// Sum of weight × quantity across all lines, excluding packaging.
    #[must_use]
    pub fn contents_weight(&self) -> Decimal {
        self.items.iter().map(CartLine::line_weight).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Mark the cart as updated at `now`.
    pub fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}
