//! Test helpers.

use salvo::{affix_state::inject, prelude::*};

use crate::{checkout, platform::MockCommercePlatform, state::State};

pub(crate) fn checkout_service(platform: MockCommercePlatform) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::from_platform(platform)))
            .push(Router::with_path("checkout").get(checkout::handler)),
    )
}
