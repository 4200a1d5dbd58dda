//! Checkout errors.

use agroverse::checkout::ValidationErrors;
use thiserror::Error;

use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("checkout form is invalid: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("cart is empty")]
    EmptyCart,

    #[error("no shipping option selected")]
    NoShippingSelected,

    #[error("checkout service is not configured")]
    NotConfigured,

    #[error("failed to create checkout session")]
    Failed(#[source] ServiceError),

    #[error("checkout is already being submitted")]
    AlreadySubmitting,
}

impl From<ServiceError> for CheckoutError {
    fn from(error: ServiceError) -> Self {
        if error.is_not_configured() {
            Self::NotConfigured
        } else {
            Self::Failed(error)
        }
    }
}

impl CheckoutError {
    /// Messages to show the shopper, one per line.
    #[must_use]
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            Self::Invalid(errors) => errors.messages(),
            other => vec![other.user_message()],
        }
    }

    /// Message to show the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(errors) => errors.to_string(),
            Self::EmptyCart => "Your cart is empty".to_string(),
            Self::NoShippingSelected => {
                "Please select a shipping option before continuing".to_string()
            }
            Self::NotConfigured => "Checkout service not configured".to_string(),
            Self::Failed(_) => "Failed to process checkout. Please try again.".to_string(),
            Self::AlreadySubmitting => "Your order is already being processed".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_detail_is_hidden_from_the_shopper() {
        let error = CheckoutError::from(ServiceError::Remote("Stripe key invalid".to_string()));

        assert_eq!(error.user_message(), "Failed to process checkout. Please try again.");
        assert!(matches!(
            CheckoutError::from(ServiceError::NotConfigured),
            CheckoutError::NotConfigured
        ));
    }
}
