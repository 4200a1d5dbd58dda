//! Checkout Form

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::LazyLock,
};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::{DEFAULT_COUNTRY, ShippingAddress};

#[expect(clippy::expect_used, reason = "the pattern is a literal")]
static ZIP_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").expect("ZIP pattern compiles"));

/// Checkout form field values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    /// Customer name
    pub full_name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Postal code
    pub zip: String,
    /// Country code
    pub country: String,
}

/// A checkout form field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Full name is required")]
    FullName,

    #[error("Valid email is required")]
    Email,

    #[error("Valid phone number is required")]
    Phone,

    #[error("Street address is required")]
    Address,

    #[error("City is required")]
    City,

    #[error("State is required")]
    State,

    #[error("Valid ZIP code is required")]
    Zip,

    #[error("Country is required")]
    Country,
}

/// Every validation failure of a form, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Failed fields.
    #[must_use]
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// User-facing messages.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn long_enough(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

impl CheckoutForm {
    /// Check every field rule, collecting all failures.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` listing each failed field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let checks = [
            (long_enough(&self.full_name, 2), FieldError::FullName),
            (self.email.contains('@'), FieldError::Email),
            (long_enough(&self.phone, 10), FieldError::Phone),
            (long_enough(&self.address, 5), FieldError::Address),
            (long_enough(&self.city, 2), FieldError::City),
            (long_enough(&self.state, 2), FieldError::State),
            (ZIP_CODE.is_match(&self.zip), FieldError::Zip),
            (!self.country.is_empty(), FieldError::Country),
        ];

        let errors: Vec<_> = checks
            .into_iter()
            .filter_map(|(ok, error)| (!ok).then_some(error))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    /// The shipping address portion of the form.
    #[must_use]
    pub fn shipping_address(&self) -> ShippingAddress {
        ShippingAddress::from_fields(
            &self.address,
            &self.city,
            &self.state,
            &self.zip,
            Some(&self.country),
        )
    }

    /// Country, falling back to the default when blank.
    #[must_use]
    pub fn country_or_default(&self) -> &str {
        if self.country.trim().is_empty() {
            DEFAULT_COUNTRY
        } else {
            &self.country
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            full_name: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            phone: "5105550100".to_string(),
            address: "1 Cacao Way".to_string(),
            city: "Oakland".to_string(),
            state: "CA".to_string(),
            zip: "94607".to_string(),
            country: "US".to_string(),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert_eq!(valid_form().validate(), Ok(()));
    }

    #[test]
    fn accepts_zip_plus_four() {
        let form = CheckoutForm {
            zip: "94607-1234".to_string(),
            ..valid_form()
        };

        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn reports_every_failure_in_field_order() {
        let Err(errors) = CheckoutForm::default().validate() else {
            panic!("empty form should fail validation");
        };

        assert_eq!(
            errors.fields(),
            [
                FieldError::FullName,
                FieldError::Email,
                FieldError::Phone,
                FieldError::Address,
                FieldError::City,
                FieldError::State,
                FieldError::Zip,
                FieldError::Country,
            ]
        );
    }

    #[test]
    fn lengths_are_measured_after_trimming() {
        let form = CheckoutForm {
            full_name: " A ".to_string(),
            phone: "   555 0100   ".to_string(),
            ..valid_form()
        };

        let errors = form.validate().err().map(|errors| errors.messages());

        assert_eq!(
            errors,
            Some(vec![
                "Full name is required".to_string(),
                "Valid phone number is required".to_string(),
            ])
        );
    }

    #[test]
    fn rejects_malformed_zip() {
        for zip in ["9460", "946071", "94607-12", "ABCDE", " 94607"] {
            let form = CheckoutForm {
                zip: zip.to_string(),
                ..valid_form()
            };

            assert_eq!(
                form.validate().err().map(|errors| errors.fields().to_vec()),
                Some(vec![FieldError::Zip]),
                "zip {zip:?} should be rejected"
            );
        }
    }

    #[test]
    fn shipping_address_defaults_country() {
        let form = CheckoutForm {
            country: String::new(),
            ..valid_form()
        };

        assert_eq!(form.shipping_address().country, DEFAULT_COUNTRY);
        assert_eq!(form.country_or_default(), DEFAULT_COUNTRY);
    }
}
