//! State

use std::sync::Arc;

use crate::platform::CommercePlatform;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) platform: Arc<dyn CommercePlatform>,
}

impl State {
    #[must_use]
    pub(crate) fn new(platform: Arc<dyn CommercePlatform>) -> Self {
        Self { platform }
    }

    #[must_use]
    pub(crate) fn from_platform(platform: impl CommercePlatform + 'static) -> Arc<Self> {
        Arc::new(Self::new(Arc::new(platform)))
    }
}
