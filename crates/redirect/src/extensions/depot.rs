//! Depot access to the injected platform client.

use std::sync::Arc;

use salvo::prelude::{Depot, StatusError};
use tracing::error;

use crate::{platform::CommercePlatform, state::State};

pub(crate) trait DepotExt {
    /// The commerce platform from the injected `State`, or a logged 500.
    fn platform_or_500(&self) -> Result<Arc<dyn CommercePlatform>, StatusError>;
}

impl DepotExt for Depot {
    fn platform_or_500(&self) -> Result<Arc<dyn CommercePlatform>, StatusError> {
        self.obtain::<Arc<State>>()
            .map(|state| Arc::clone(&state.platform))
            .map_err(|_missing| {
                error!("redirect state was not injected into the depot");

                StatusError::internal_server_error()
            })
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        prelude::*,
        test::TestClient,
    };
    use testresult::TestResult;

    use crate::{platform::MockCommercePlatform, state::State};

    use super::*;

    #[handler]
    async fn platform_status(depot: &mut Depot, res: &mut Response) {
        match depot.platform_or_500() {
            Ok(_platform) => res.status_code(StatusCode::NO_CONTENT),
            Err(status) => res.status_code(status.code),
        };
    }

    #[tokio::test]
    async fn missing_state_is_an_internal_error() -> TestResult {
        let service = Service::new(Router::with_path("platform").get(platform_status));

        let res = TestClient::get("http://example.com/platform").send(&service).await;

        assert_eq!(
            res.status_code,
            Some(StatusCode::INTERNAL_SERVER_ERROR),
            "missing state should be a 500"
        );

        Ok(())
    }

    #[tokio::test]
    async fn injected_state_yields_the_platform() -> TestResult {
        let service = Service::new(
            Router::new()
                .hoop(inject(State::from_platform(MockCommercePlatform::new())))
                .push(Router::with_path("platform").get(platform_status)),
        );

        let res = TestClient::get("http://example.com/platform").send(&service).await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT), "expected the platform");

        Ok(())
    }
}
