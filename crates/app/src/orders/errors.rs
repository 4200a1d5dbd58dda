//! Order status errors.

use thiserror::Error;

use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum OrderStatusError {
    #[error("no session id given")]
    MissingSessionId,

    #[error("order not found")]
    NotFound,

    #[error("order status lookup failed")]
    Service(#[from] ServiceError),
}

impl OrderStatusError {
    /// Message to show the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingSessionId => "No order number provided. Please check your order \
                confirmation email for the order number."
                .to_string(),
            Self::NotFound => "Order not found. Please verify your order number.".to_string(),
            Self::Service(ServiceError::Remote(message)) => message.clone(),
            Self::Service(ServiceError::NotConfigured) => {
                "Order status service not configured".to_string()
            }
            Self::Service(_) => {
                "Failed to load order status. Please try again later.".to_string()
            }
        }
    }
}
