//! Platform Errors

use thiserror::Error;

/// Failure talking to the commerce platform.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Transport failure, timeout or undecodable body.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Non-success status, or a body missing the expected id.
    #[error("{0}")]
    UnexpectedResponse(String),
}
