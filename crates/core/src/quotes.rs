//! Wholesale Quote Requests

use serde::{Deserialize, Serialize};
use thiserror::Error;

const fn default_quantity() -> u32 {
    1
}

/// A product a wholesale buyer wants priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteProduct {
    /// Catalog product id
    pub product_id: String,

    /// Requested quantity
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl QuoteProduct {
    /// Product with a requested quantity, at least one.
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity: quantity.max(1),
        }
    }
}

/// Wholesale quote request form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteRequest {
    /// Products to price
    pub products: Vec<QuoteProduct>,
    /// Buyer business
    pub business_name: String,
    /// Person to contact
    pub contact_name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Kind of business
    pub company_type: String,
    /// Free-form delivery address
    pub shipping_address: String,
    /// How often the buyer expects to order
    pub expected_frequency: String,
    /// Anything else
    pub notes: String,
}

/// A quote request field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuoteFieldError {
    #[error("Please select at least one product")]
    Products,

    #[error("Business name is required")]
    BusinessName,

    #[error("Contact name is required")]
    ContactName,

    #[error("Valid email address is required")]
    Email,

    #[error("Valid phone number is required")]
    Phone,

    #[error("Shipping address is required")]
    ShippingAddress,
}

fn long_enough(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

impl QuoteRequest {
    /// Check every rule, returning all failures in form order.
    ///
    /// # Errors
    ///
    /// Returns the failed fields when any rule does not hold.
    pub fn validate(&self) -> Result<(), Vec<QuoteFieldError>> {
        let errors: Vec<_> = [
            (!self.products.is_empty(), QuoteFieldError::Products),
            (long_enough(&self.business_name, 2), QuoteFieldError::BusinessName),
            (long_enough(&self.contact_name, 2), QuoteFieldError::ContactName),
            (self.email.contains('@'), QuoteFieldError::Email),
            (long_enough(&self.phone, 10), QuoteFieldError::Phone),
            (
                long_enough(&self.shipping_address, 10),
                QuoteFieldError::ShippingAddress,
            ),
        ]
        .into_iter()
        .filter_map(|(ok, error)| (!ok).then_some(error))
        .collect();

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn request() -> QuoteRequest {
        QuoteRequest {
            products: vec![QuoteProduct::new("organic-criollo-cacao-beans-oscar-farm", 25)],
            business_name: "Kiki's Chocolate".to_string(),
            contact_name: "Kiki".to_string(),
            email: "kiki@example.com".to_string(),
            phone: "(510) 555-0100".to_string(),
            company_type: "chocolatier".to_string(),
            shipping_address: "1 Cacao Way, Oakland CA 94607".to_string(),
            expected_frequency: "monthly".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn complete_request_is_valid() {
        assert_eq!(request().validate(), Ok(()));
    }

    #[test]
    fn empty_request_reports_every_rule() {
        assert_eq!(
            QuoteRequest::default().validate(),
            Err(vec![
                QuoteFieldError::Products,
                QuoteFieldError::BusinessName,
                QuoteFieldError::ContactName,
                QuoteFieldError::Email,
                QuoteFieldError::Phone,
                QuoteFieldError::ShippingAddress,
            ])
        );
    }

    #[test]
    fn short_address_is_rejected() {
        let request = QuoteRequest {
            shipping_address: " Oakland  ".to_string(),
            ..request()
        };

        assert_eq!(request.validate(), Err(vec![QuoteFieldError::ShippingAddress]));
    }

    #[test]
    fn zero_quantity_becomes_one() {
        assert_eq!(QuoteProduct::new("beans", 0).quantity, 1);
    }

    #[test]
    fn serializes_with_camel_case_keys() -> TestResult {
        let json = serde_json::to_value(request())?;

        assert_eq!(json["businessName"], "Kiki's Chocolate");
        assert_eq!(json["products"][0]["productId"], "organic-criollo-cacao-beans-oscar-farm");
        assert_eq!(json["products"][0]["quantity"], 25);

        Ok(())
    }
}
