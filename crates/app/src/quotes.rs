//! Wholesale quote submission.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use agroverse::{
    environment::Environment,
    quotes::{QuoteFieldError, QuoteRequest},
};
use thiserror::Error;
use tracing::{error, info};

use crate::service::{CommerceService, ServiceError};

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("quote request is invalid")]
    Invalid(Vec<QuoteFieldError>),

    #[error("quote service is not configured")]
    NotConfigured,

    #[error("failed to submit quote request")]
    Service(#[source] ServiceError),
}

impl From<ServiceError> for QuoteError {
    fn from(error: ServiceError) -> Self {
        if error.is_not_configured() {
            Self::NotConfigured
        } else {
            Self::Service(error)
        }
    }
}

impl QuoteError {
    /// Messages to show the buyer.
    #[must_use]
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            Self::Invalid(fields) => fields.iter().map(ToString::to_string).collect(),
            Self::NotConfigured => vec!["Quote service not configured".to_string()],
            Self::Service(ServiceError::Remote(message)) => vec![message.clone()],
            Self::Service(_) => vec![
                "Failed to submit quote request. Please try again or contact us directly."
                    .to_string(),
            ],
        }
    }
}

/// Sends wholesale quote requests.
pub struct QuoteRequests {
    service: Arc<dyn CommerceService>,
    environment: Environment,
}

impl QuoteRequests {
    pub fn new(service: Arc<dyn CommerceService>, environment: Environment) -> Self {
        Self {
            service,
            environment,
        }
    }

    /// Validate and send `request`. Nothing is sent when validation fails.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` with every failed field, or the service failure.
    pub async fn submit(&self, request: QuoteRequest) -> Result<(), QuoteError> {
        request.validate().map_err(QuoteError::Invalid)?;

        let products = request.products.len();

        self.service
            .submit_quote_request(self.environment, request)
            .await
            .inspect_err(|service_error| error!("quote request failed: {service_error}"))?;

        info!(products, "quote request submitted");

        Ok(())
    }
}

impl Debug for QuoteRequests {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("QuoteRequests")
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use agroverse::quotes::QuoteProduct;
    use testresult::TestResult;

    use crate::service::MockCommerceService;

    use super::*;

    fn request() -> QuoteRequest {
        QuoteRequest {
            products: vec![QuoteProduct::new("ceremonial-cacao", 40)],
            business_name: "Oakland Chocolate Co".to_string(),
            contact_name: "Sam Rivera".to_string(),
            email: "sam@example.com".to_string(),
            phone: "5105550100".to_string(),
            company_type: "cafe".to_string(),
            shipping_address: "1 Cacao Way, Oakland CA 94607".to_string(),
            expected_frequency: "monthly".to_string(),
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn valid_request_is_sent_with_the_environment() -> TestResult {
        let mut service = MockCommerceService::new();

        service
            .expect_submit_quote_request()
            .withf(|environment, request| {
                *environment == Environment::Development && request.business_name == "Oakland Chocolate Co"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        QuoteRequests::new(Arc::new(service), Environment::Development)
            .submit(request())
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn invalid_request_is_not_sent() {
        let mut service = MockCommerceService::new();

        service.expect_submit_quote_request().never();

        let result = QuoteRequests::new(Arc::new(service), Environment::Production)
            .submit(QuoteRequest {
                products: Vec::new(),
                phone: "555".to_string(),
                ..request()
            })
            .await;

        let messages = result.err().map(|error| error.user_messages()).unwrap_or_default();

        assert_eq!(
            messages,
            ["Please select at least one product", "Valid phone number is required"]
        );
    }

    #[tokio::test]
    async fn transport_failure_gets_the_generic_message() {
        let mut service = MockCommerceService::new();

        service
            .expect_submit_quote_request()
            .returning(|_, _| Err(ServiceError::UnexpectedResponse("500".to_string())));

        let result = QuoteRequests::new(Arc::new(service), Environment::Production)
            .submit(request())
            .await;

        assert!(matches!(result, Err(QuoteError::Service(_))));
    }
}
