use std::{sync::Arc, time::Duration};

use agroverse::address::ShippingAddress;

use crate::{debounce::Debouncer, shipping::ShippingNegotiator};

/// Quiet period between leaving an address field and the rate lookup.
pub const RECALCULATE_DELAY: Duration = Duration::from_millis(500);

/// Wires address field events to the negotiator.
///
/// Leaving a field schedules a lookup once edits settle; typing invalidates
/// the current options straight away.
#[derive(Debug)]
pub struct AddressWatcher {
    negotiator: Arc<ShippingNegotiator>,
    debouncer: Debouncer<ShippingAddress>,
}

impl AddressWatcher {
    /// Watcher with the standard quiet period.
    pub fn new(negotiator: Arc<ShippingNegotiator>) -> Self {
        Self::with_delay(negotiator, RECALCULATE_DELAY)
    }

    /// Watcher with a custom quiet period.
    pub fn with_delay(negotiator: Arc<ShippingNegotiator>, delay: Duration) -> Self {
        let background = Arc::clone(&negotiator);

        let debouncer = Debouncer::new(delay, move |address: ShippingAddress| {
            let negotiator = Arc::clone(&background);

            async move {
                negotiator.calculate(address).await;
            }
        });

        Self {
            negotiator,
            debouncer,
        }
    }

    /// An address field lost focus.
    pub fn on_blur(&self, address: ShippingAddress) {
        self.debouncer.trigger(address);
    }

    /// An address field changed.
    ///
    /// Also drops a lookup scheduled by an earlier blur, which would carry the
    /// old address.
    pub async fn on_input(&self) {
        self.debouncer.cancel();
        self.negotiator.invalidate().await;
    }

    /// Negotiator being driven.
    #[must_use]
    pub fn negotiator(&self) -> &Arc<ShippingNegotiator> {
        &self.negotiator
    }
}

#[cfg(test)]
mod tests {
    use agroverse::{cart::NewCartLine, environment::Environment, shipping::ShippingRateQuote};
    use rust_decimal::Decimal;
    use testresult::TestResult;
    use tokio::time::sleep;

    use crate::{
        cart::{CartStore, CatalogHandle},
        service::MockCommerceService,
        shipping::ShippingStatus,
        storage::MemoryStorage,
    };

    use super::*;

    fn watcher(service: MockCommerceService) -> TestResult<AddressWatcher> {
        let cart = CartStore::new(Arc::new(MemoryStorage::new()), CatalogHandle::new());

        cart.add_item(
            NewCartLine::new("nibs", "Cacao Nibs", Decimal::new(1200, 2)).weight(Decimal::new(4, 0)),
        )?;

        let negotiator = ShippingNegotiator::new(Arc::new(service), cart, Environment::Development);

        Ok(AddressWatcher::new(Arc::new(negotiator)))
    }

    fn ground() -> Vec<ShippingRateQuote> {
        vec![ShippingRateQuote {
            id: "ground".to_string(),
            name: "USPS Ground Advantage".to_string(),
            amount: Decimal::new(785, 2),
            delivery_days: "2-5 business days".to_string(),
        }]
    }

    fn address() -> ShippingAddress {
        ShippingAddress::from_fields("1 Cacao Way", "Oakland", "CA", "94607", None)
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_blurs_collapse_into_one_lookup() -> TestResult {
        let mut service = MockCommerceService::new();

        service
            .expect_calculate_shipping_rates()
            .times(1)
            .returning(|_| Ok(ground()));

        let watcher = watcher(service)?;

        watcher.on_blur(address());
        sleep(Duration::from_millis(200)).await;
        watcher.on_blur(address());
        sleep(Duration::from_millis(200)).await;

        assert_eq!(watcher.negotiator().view().status, ShippingStatus::Idle);

        sleep(Duration::from_millis(400)).await;

        assert_eq!(watcher.negotiator().view().status, ShippingStatus::Ready);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn typing_cancels_the_scheduled_lookup() -> TestResult {
        let mut service = MockCommerceService::new();

        service.expect_calculate_shipping_rates().never();

        let watcher = watcher(service)?;

        watcher.on_blur(address());
        watcher.on_input().await;
        sleep(Duration::from_secs(1)).await;

        assert_eq!(watcher.negotiator().view().status, ShippingStatus::Idle);

        Ok(())
    }
}
