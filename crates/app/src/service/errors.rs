//! Remote service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service endpoint is not configured")]
    NotConfigured,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from service: {0}")]
    UnexpectedResponse(String),

    #[error("service reported an error: {0}")]
    Remote(String),

    #[error("failed to encode request parameter")]
    Encode(#[source] serde_json::Error),
}

impl ServiceError {
    /// Whether the failure is a missing or placeholder endpoint.
    #[must_use]
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }

    /// Whether the request ran past the client timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(error) if error.is_timeout())
    }
}
