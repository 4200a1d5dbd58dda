//! Shipping rate negotiation.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use agroverse::{
    address::{AddressFingerprint, ShippingAddress},
    environment::Environment,
    shipping::{PackageWeightContract, ShippingRateQuote, cheapest, package_weight},
};
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

use crate::{
    cart::CartStore,
    service::{CommerceService, RateRequest, ServiceError},
    shipping::view::{CALCULATION_FAILED, RateOutcome, ShippingStatus, ShippingView},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectRateError {
    #[error("shipping option {0} is not among the displayed options")]
    UnknownRate(String),
}

#[derive(Debug, Default)]
struct NegotiationState {
    last_fingerprint: Option<AddressFingerprint>,
    quotes: Vec<ShippingRateQuote>,
    selected: Option<ShippingRateQuote>,

    /// Bumped by every lookup and invalidation; a response is applied only
    /// while its token is still current.
    generation: u64,
}

impl NegotiationState {
    /// Drop the cached options so nothing from an earlier address stays selectable.
    fn forget_quotes(&mut self) {
        self.last_fingerprint = None;
        self.quotes.clear();
        self.selected = None;
    }
}

/// Keeps shipping options in step with the customer's address.
///
/// One lookup per distinct address, cached until the address changes. Only
/// the latest lookup's response is ever applied.
pub struct ShippingNegotiator {
    service: Arc<dyn CommerceService>,
    cart: CartStore,
    environment: Environment,
    contract: PackageWeightContract,
    state: Mutex<NegotiationState>,
    view: watch::Sender<ShippingView>,
}

impl ShippingNegotiator {
    /// Negotiator for the cart in `cart`, quoting against `environment`.
    pub fn new(service: Arc<dyn CommerceService>, cart: CartStore, environment: Environment) -> Self {
        let (view, _rx) = watch::channel(ShippingView::default());

        Self {
            service,
            cart,
            environment,
            contract: PackageWeightContract::default(),
            state: Mutex::new(NegotiationState::default()),
            view,
        }
    }

    /// Subscribe to view updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ShippingView> {
        self.view.subscribe()
    }

    /// The current view.
    #[must_use]
    pub fn view(&self) -> ShippingView {
        self.view.borrow().clone()
    }

    /// Fetch, or redisplay, shipping options for `address`.
    pub async fn calculate(&self, address: ShippingAddress) -> RateOutcome {
        if let Err(reconcile_error) = self.cart.reconcile_weights() {
            warn!("weight reconciliation failed before rate lookup: {reconcile_error}");
        }

        let cart = self.cart.get_cart();

        let token = {
            let mut state = self.state.lock().await;

            if cart.is_empty() || !address.is_complete() {
                state.generation += 1;
                state.forget_quotes();

                self.publish(ShippingView::message(ShippingStatus::NeedsAddress));

                return RateOutcome::NeedsAddress;
            }

            let fingerprint = address.fingerprint();

            if state.last_fingerprint.as_ref() == Some(&fingerprint) && !state.quotes.is_empty() {
                let selected = state
                    .selected
                    .as_ref()
                    .and_then(|chosen| state.quotes.iter().find(|quote| quote.id == chosen.id))
                    .or_else(|| cheapest(&state.quotes))
                    .cloned();

                state.selected.clone_from(&selected);

                debug!(fingerprint = fingerprint.as_str(), "redisplaying cached shipping options");

                self.publish(ShippingView::showing(
                    ShippingStatus::Ready,
                    state.quotes.clone(),
                    selected,
                ));

                return RateOutcome::Cached;
            }

            state.generation += 1;
            state.forget_quotes();

            self.publish(ShippingView::message(ShippingStatus::Calculating));

            state.generation
        };

        let request = RateRequest {
            environment: self.environment,
            weight_oz: package_weight(&cart, self.contract),
            address,
        };

        let fingerprint = request.address.fingerprint();

        info!(
            weight_oz = %request.weight_oz,
            items = cart.item_count(),
            "requesting shipping rates"
        );

        let result = self.service.calculate_shipping_rates(request).await;

        let mut state = self.state.lock().await;

        if state.generation != token {
            debug!(token, current = state.generation, "discarding superseded shipping rates");

            return RateOutcome::Superseded;
        }

        match result {
            Ok(quotes) if quotes.is_empty() => {
                state.forget_quotes();

                self.publish(ShippingView::message(ShippingStatus::Unavailable));

                RateOutcome::Unavailable
            }
            Ok(quotes) => {
                let selected = cheapest(&quotes).cloned();

                state.last_fingerprint = Some(fingerprint);
                state.selected.clone_from(&selected);
                state.quotes.clone_from(&quotes);

                self.publish(ShippingView::showing(ShippingStatus::Ready, quotes, selected));

                RateOutcome::Quoted
            }
            Err(ServiceError::NotConfigured) => {
                state.forget_quotes();

                warn!("shipping calculator not configured");

                self.publish(ShippingView::message(ShippingStatus::NotConfigured));

                RateOutcome::NotConfigured
            }
            Err(ServiceError::Remote(message)) => {
                state.forget_quotes();

                warn!("rate service rejected the request: {message}");

                self.publish(ShippingView::message(ShippingStatus::Failed(message)));

                RateOutcome::Failed
            }
            Err(service_error) => {
                state.forget_quotes();

                error!("failed to calculate shipping rates: {service_error}");

                self.publish(ShippingView::message(ShippingStatus::Failed(
                    CALCULATION_FAILED.to_string(),
                )));

                RateOutcome::Failed
            }
        }
    }

    /// Forget cached options and selection after the address changed.
    ///
    /// Any lookup still in flight is superseded.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;

        state.generation += 1;
        state.forget_quotes();

        self.publish(ShippingView::default());
    }

    /// Choose a displayed option, or clear the choice with `None`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRate` for an option that is not currently displayed,
    /// including any option while no quote set is showing.
    pub async fn set_selected_rate(&self, rate_id: Option<&str>) -> Result<(), SelectRateError> {
        let mut state = self.state.lock().await;
        let showing = self.view.borrow().status == ShippingStatus::Ready;

        let selected = match rate_id {
            None => None,
            Some(id) => Some(
                state
                    .quotes
                    .iter()
                    .find(|quote| showing && quote.id == id)
                    .cloned()
                    .ok_or_else(|| SelectRateError::UnknownRate(id.to_string()))?,
            ),
        };

        state.selected.clone_from(&selected);

        self.view.send_modify(|view| {
            *view = ShippingView::showing(view.status.clone(), view.quotes.clone(), selected);
        });

        Ok(())
    }

    /// The chosen option, if any.
    pub async fn selected_rate(&self) -> Option<ShippingRateQuote> {
        self.state.lock().await.selected.clone()
    }

    fn publish(&self, view: ShippingView) {
        self.view.send_replace(view);
    }
}

impl Debug for ShippingNegotiator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ShippingNegotiator")
            .field("environment", &self.environment)
            .field("contract", &self.contract)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use agroverse::cart::NewCartLine;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        cart::CatalogHandle,
        service::MockCommerceService,
        shipping::view::{CheckoutGate, ShippingStatus},
        storage::MemoryStorage,
    };

    use super::*;

    fn quote(id: &str, amount: i64) -> ShippingRateQuote {
        ShippingRateQuote {
            id: id.to_string(),
            name: format!("Option {id}"),
            amount: Decimal::new(amount, 2),
            delivery_days: "3-5 business days".to_string(),
        }
    }

    fn address(zip: &str) -> ShippingAddress {
        ShippingAddress::from_fields("1 Cacao Way", "Oakland", "CA", zip, None)
    }

    fn cart_with_item() -> TestResult<CartStore> {
        let store = CartStore::new(Arc::new(MemoryStorage::new()), CatalogHandle::new());

        store.add_item(
            NewCartLine::new("ceremonial-cacao", "Ceremonial Cacao", Decimal::new(2500, 2))
                .weight(Decimal::new(8, 0))
                .quantity(2),
        )?;

        Ok(store)
    }

    fn negotiator(service: impl CommerceService + 'static, cart: CartStore) -> ShippingNegotiator {
        ShippingNegotiator::new(Arc::new(service), cart, Environment::Production)
    }

    #[tokio::test]
    async fn incomplete_address_locks_without_calling_the_service() -> TestResult {
        let mut service = MockCommerceService::new();

        service.expect_calculate_shipping_rates().never();

        let negotiator = negotiator(service, cart_with_item()?);

        let outcome = negotiator
            .calculate(ShippingAddress::from_fields("1 Cacao Way", "", "CA", "94607", None))
            .await;

        assert_eq!(outcome, RateOutcome::NeedsAddress);

        let view = negotiator.view();

        assert_eq!(view.status, ShippingStatus::NeedsAddress);
        assert_eq!(view.gate, CheckoutGate::Locked);

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_needs_no_lookup() {
        let mut service = MockCommerceService::new();

        service.expect_calculate_shipping_rates().never();

        let cart = CartStore::new(Arc::new(MemoryStorage::new()), CatalogHandle::new());
        let negotiator = negotiator(service, cart);

        assert_eq!(negotiator.calculate(address("94607")).await, RateOutcome::NeedsAddress);
    }

    #[tokio::test]
    async fn quotes_select_the_cheapest_and_send_package_weight() -> TestResult {
        let mut service = MockCommerceService::new();

        service
            .expect_calculate_shipping_rates()
            .withf(|request| {
                // 16 oz of contents, 11.5 oz box, 2 x 0.65 oz packaging
                request.weight_oz == Decimal::new(288, 1) && request.address.zip == "94607"
            })
            .times(1)
            .returning(|_| Ok(vec![quote("priority", 1250), quote("ground", 785)]));

        let negotiator = negotiator(service, cart_with_item()?);

        assert_eq!(negotiator.calculate(address("94607")).await, RateOutcome::Quoted);

        let view = negotiator.view();

        assert_eq!(view.status, ShippingStatus::Ready);
        assert_eq!(view.quotes.len(), 2);
        assert_eq!(view.selected.map(|rate| rate.id), Some("ground".to_string()));
        assert_eq!(view.gate, CheckoutGate::Unlocked);

        Ok(())
    }

    #[tokio::test]
    async fn same_address_uses_the_cache_and_keeps_the_choice() -> TestResult {
        let mut service = MockCommerceService::new();

        service
            .expect_calculate_shipping_rates()
            .times(1)
            .returning(|_| Ok(vec![quote("priority", 1250), quote("ground", 785)]));

        let negotiator = negotiator(service, cart_with_item()?);

        negotiator.calculate(address("94607")).await;
        negotiator.set_selected_rate(Some("priority")).await?;

        assert_eq!(negotiator.calculate(address("94607")).await, RateOutcome::Cached);
        assert_eq!(
            negotiator.selected_rate().await.map(|rate| rate.id),
            Some("priority".to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn invalidation_forces_a_new_lookup() -> TestResult {
        let mut service = MockCommerceService::new();

        service
            .expect_calculate_shipping_rates()
            .times(2)
            .returning(|_| Ok(vec![quote("ground", 785)]));

        let negotiator = negotiator(service, cart_with_item()?);

        negotiator.calculate(address("94607")).await;
        negotiator.invalidate().await;

        assert_eq!(negotiator.selected_rate().await, None);
        assert_eq!(negotiator.view().gate, CheckoutGate::Locked);

        assert_eq!(negotiator.calculate(address("94607")).await, RateOutcome::Quoted);

        Ok(())
    }

    #[tokio::test]
    async fn selection_must_come_from_the_displayed_options() -> TestResult {
        let mut service = MockCommerceService::new();

        service
            .expect_calculate_shipping_rates()
            .returning(|_| Ok(vec![quote("ground", 785)]));

        let negotiator = negotiator(service, cart_with_item()?);

        negotiator.calculate(address("94607")).await;

        assert_eq!(
            negotiator.set_selected_rate(Some("overnight")).await,
            Err(SelectRateError::UnknownRate("overnight".to_string()))
        );

        negotiator.set_selected_rate(None).await?;

        let view = negotiator.view();

        assert_eq!(view.selected, None);
        assert_eq!(view.gate, CheckoutGate::Locked);
        assert_eq!(view.quotes.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn failures_map_to_display_messages() -> TestResult {
        let cases = [
            (ServiceError::NotConfigured, RateOutcome::NotConfigured, ShippingStatus::NotConfigured),
            (
                ServiceError::Remote("Invalid ZIP".to_string()),
                RateOutcome::Failed,
                ShippingStatus::Failed("Invalid ZIP".to_string()),
            ),
            (
                ServiceError::UnexpectedResponse("500".to_string()),
                RateOutcome::Failed,
                ShippingStatus::Failed("Error calculating shipping. Please try again.".to_string()),
            ),
        ];

        for (failure, expected_outcome, expected_status) in cases {
            let mut service = MockCommerceService::new();

            service
                .expect_calculate_shipping_rates()
                .return_once(move |_| Err(failure));

            let negotiator = negotiator(service, cart_with_item()?);

            assert_eq!(negotiator.calculate(address("94607")).await, expected_outcome);

            let view = negotiator.view();

            assert_eq!(view.status, expected_status);
            assert_eq!(view.gate, CheckoutGate::Locked);
        }

        Ok(())
    }

    #[tokio::test]
    async fn failed_lookup_leaves_nothing_from_the_previous_address_selectable() -> TestResult {
        let mut service = MockCommerceService::new();

        service
            .expect_calculate_shipping_rates()
            .withf(|request| request.address.zip == "94607")
            .times(1)
            .returning(|_| Ok(vec![quote("ground", 785)]));
        service
            .expect_calculate_shipping_rates()
            .withf(|request| request.address.zip == "10001")
            .times(1)
            .returning(|_| Err(ServiceError::Remote("Invalid ZIP".to_string())));

        let negotiator = negotiator(service, cart_with_item()?);

        assert_eq!(negotiator.calculate(address("94607")).await, RateOutcome::Quoted);
        assert_eq!(negotiator.calculate(address("10001")).await, RateOutcome::Failed);

        assert_eq!(
            negotiator.set_selected_rate(Some("ground")).await,
            Err(SelectRateError::UnknownRate("ground".to_string())),
            "a quote for the old address must not be selectable"
        );

        let view = negotiator.view();

        assert_eq!(view.status, ShippingStatus::Failed("Invalid ZIP".to_string()));
        assert_eq!(view.gate, CheckoutGate::Locked);
        assert_eq!(negotiator.selected_rate().await, None);

        Ok(())
    }

    #[tokio::test]
    async fn incomplete_address_forgets_earlier_quotes() -> TestResult {
        let mut service = MockCommerceService::new();

        service
            .expect_calculate_shipping_rates()
            .times(2)
            .returning(|_| Ok(vec![quote("ground", 785)]));

        let negotiator = negotiator(service, cart_with_item()?);

        assert_eq!(negotiator.calculate(address("94607")).await, RateOutcome::Quoted);
        assert_eq!(
            negotiator
                .calculate(ShippingAddress::from_fields("", "", "", "", None))
                .await,
            RateOutcome::NeedsAddress
        );

        assert_eq!(
            negotiator.set_selected_rate(Some("ground")).await,
            Err(SelectRateError::UnknownRate("ground".to_string())),
            "nothing is displayed while the address is incomplete"
        );
        assert_eq!(negotiator.view().gate, CheckoutGate::Locked);

        // Returning to the old address must look the rates up again.
        assert_eq!(negotiator.calculate(address("94607")).await, RateOutcome::Quoted);

        Ok(())
    }

    #[tokio::test]
    async fn no_options_is_unavailable() -> TestResult {
        let mut service = MockCommerceService::new();

        service
            .expect_calculate_shipping_rates()
            .returning(|_| Ok(Vec::new()));

        let negotiator = negotiator(service, cart_with_item()?);

        assert_eq!(negotiator.calculate(address("94607")).await, RateOutcome::Unavailable);
        assert_eq!(
            negotiator.view().status.message(),
            Some("No shipping options available")
        );

        Ok(())
    }

    mod ordering {
        use agroverse::{environment::Environment, orders::Order, quotes::QuoteRequest};
        use async_trait::async_trait;
        use tokio::sync::{mpsc, oneshot};

        use crate::service::CheckoutRequest;

        use super::*;

        type Reply = oneshot::Sender<Result<Vec<ShippingRateQuote>, ServiceError>>;

        /// Hands every rate request to the test, which answers when it likes.
        struct ScriptedService {
            calls: mpsc::UnboundedSender<(RateRequest, Reply)>,
        }

        #[async_trait]
        impl CommerceService for ScriptedService {
            async fn calculate_shipping_rates(
                &self,
                request: RateRequest,
            ) -> Result<Vec<ShippingRateQuote>, ServiceError> {
                let (reply, response) = oneshot::channel();

                self.calls
                    .send((request, reply))
                    .map_err(|_| ServiceError::UnexpectedResponse("test ended".to_string()))?;

                response
                    .await
                    .unwrap_or_else(|_| Err(ServiceError::UnexpectedResponse("dropped".to_string())))
            }

            async fn create_checkout_session(
                &self,
                _request: CheckoutRequest,
            ) -> Result<String, ServiceError> {
                Err(ServiceError::NotConfigured)
            }

            async fn get_order_status(&self, _session_id: String) -> Result<Option<Order>, ServiceError> {
                Err(ServiceError::NotConfigured)
            }

            async fn submit_quote_request(
                &self,
                _environment: Environment,
                _request: QuoteRequest,
            ) -> Result<(), ServiceError> {
                Err(ServiceError::NotConfigured)
            }
        }

        fn scripted() -> TestResult<(Arc<ShippingNegotiator>, mpsc::UnboundedReceiver<(RateRequest, Reply)>)> {
            let (calls, requests) = mpsc::unbounded_channel();
            let negotiator = Arc::new(negotiator(ScriptedService { calls }, cart_with_item()?));

            Ok((negotiator, requests))
        }

        #[tokio::test]
        async fn late_response_for_an_older_address_is_discarded() -> TestResult {
            let (negotiator, mut requests) = scripted()?;

            let first = tokio::spawn({
                let negotiator = Arc::clone(&negotiator);

                async move { negotiator.calculate(address("94607")).await }
            });
            let (_, first_reply) = requests.recv().await.ok_or("no first request")?;

            let second = tokio::spawn({
                let negotiator = Arc::clone(&negotiator);

                async move { negotiator.calculate(address("10001")).await }
            });
            let (second_request, second_reply) = requests.recv().await.ok_or("no second request")?;

            assert_eq!(second_request.address.zip, "10001");

            second_reply
                .send(Ok(vec![quote("new-york", 900)]))
                .map_err(|_| "second caller gone")?;

            assert_eq!(second.await?, RateOutcome::Quoted);

            first_reply
                .send(Ok(vec![quote("oakland", 500)]))
                .map_err(|_| "first caller gone")?;

            assert_eq!(first.await?, RateOutcome::Superseded);

            let view = negotiator.view();

            assert_eq!(view.selected.map(|rate| rate.id), Some("new-york".to_string()));

            Ok(())
        }

        #[tokio::test]
        async fn invalidation_discards_the_in_flight_lookup() -> TestResult {
            let (negotiator, mut requests) = scripted()?;

            let pending = tokio::spawn({
                let negotiator = Arc::clone(&negotiator);

                async move { negotiator.calculate(address("94607")).await }
            });
            let (_, reply) = requests.recv().await.ok_or("no request")?;

            negotiator.invalidate().await;

            reply
                .send(Ok(vec![quote("ground", 785)]))
                .map_err(|_| "caller gone")?;

            assert_eq!(pending.await?, RateOutcome::Superseded);
            assert_eq!(negotiator.selected_rate().await, None);
            assert_eq!(negotiator.view().status, ShippingStatus::Idle);

            Ok(())
        }
    }
}
