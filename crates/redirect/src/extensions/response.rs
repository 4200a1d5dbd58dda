//! Redirect and plain-text replies.

use salvo::{
    http::header::LOCATION,
    prelude::{Response, StatusCode, StatusError, Text},
};
use tracing::error;

pub(crate) trait ResponseExt {
    /// Answer `302 Found` pointing at `location`.
    ///
    /// A location that is not a valid header value is logged and becomes a 500.
    fn redirect_found(&mut self, location: String) -> Result<(), StatusError>;

    /// Answer `400 Bad Request` with a `text/plain` body.
    fn bad_request_text(&mut self, body: String);
}

impl ResponseExt for Response {
    fn redirect_found(&mut self, location: String) -> Result<(), StatusError> {
        self.add_header(LOCATION, &location, true)
            .map_err(|header_error| {
                error!(location = location.as_str(), "invalid checkout location: {header_error}");

                StatusError::internal_server_error()
            })?
            .status_code(StatusCode::FOUND);

        Ok(())
    }

    fn bad_request_text(&mut self, body: String) {
        self.status_code(StatusCode::BAD_REQUEST).render(Text::Plain(body));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_sets_status_and_location() -> testresult::TestResult {
        let mut res = Response::new();

        res.redirect_found("https://pay.example.com/c/1".to_string())?;

        assert_eq!(res.status_code, Some(StatusCode::FOUND), "expected 302");
        assert_eq!(
            res.headers().get(LOCATION).and_then(|value| value.to_str().ok()),
            Some("https://pay.example.com/c/1"),
            "unexpected location"
        );

        Ok(())
    }

    #[test]
    fn unusable_location_is_an_internal_error() {
        let mut res = Response::new();

        let result = res.redirect_found("https://pay.example.com/\n".to_string());

        assert!(
            result.is_err_and(|status| status.code == StatusCode::INTERNAL_SERVER_ERROR),
            "a newline in the location should be rejected"
        );
    }
}
