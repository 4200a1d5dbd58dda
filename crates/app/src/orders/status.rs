//! Order status lookup.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use agroverse::orders::Order;
use tracing::{error, info, warn};

use crate::{
    cart::CartStore,
    orders::{OrderHistory, OrderStatusError},
    service::CommerceService,
};

/// Fetches an order after checkout and records it locally.
pub struct OrderStatusLookup {
    service: Arc<dyn CommerceService>,
    cart: CartStore,
    history: OrderHistory,
}

impl OrderStatusLookup {
    /// Lookup that clears `cart` and fills `history` for found orders.
    pub fn new(service: Arc<dyn CommerceService>, cart: CartStore, history: OrderHistory) -> Self {
        Self {
            service,
            cart,
            history,
        }
    }

    /// Fetch the order placed under `session_id`.
    ///
    /// A found order means checkout completed: the cart is cleared and the
    /// order is added to the local history.
    ///
    /// # Errors
    ///
    /// Returns `MissingSessionId` for a blank id, `NotFound` when the service
    /// has no such order and `Service` when the lookup fails.
    pub async fn lookup(&self, session_id: &str) -> Result<Order, OrderStatusError> {
        let session_id = session_id.trim();

        if session_id.is_empty() {
            return Err(OrderStatusError::MissingSessionId);
        }

        let order = self
            .service
            .get_order_status(session_id.to_string())
            .await
            .inspect_err(|service_error| error!(session_id, "order status lookup failed: {service_error}"))?
            .ok_or(OrderStatusError::NotFound)?;

        info!(session_id, status = order.status(), "order found");

        if let Err(cart_error) = self.cart.clear() {
            warn!("failed to clear cart after completed order: {cart_error}");
        }

        if let Err(history_error) = self.history.record(&order) {
            warn!("failed to record order history: {history_error}");
        }

        Ok(order)
    }

    /// Local history this lookup writes to.
    #[must_use]
    pub fn history(&self) -> &OrderHistory {
        &self.history
    }
}

impl Debug for OrderStatusLookup {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OrderStatusLookup")
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use agroverse::{cart::NewCartLine, orders::OrderItem};
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        cart::CatalogHandle,
        service::{MockCommerceService, ServiceError},
        storage::MemoryStorage,
    };

    use super::*;

    fn placed(session_id: &str) -> Order {
        Order {
            session_id: session_id.to_string(),
            date: Some("2025-03-14".to_string()),
            status: Some("Processing".to_string()),
            items: vec![OrderItem {
                name: "Ceremonial Cacao".to_string(),
                quantity: 1,
                price: Decimal::new(2500, 2),
                image: None,
            }],
            subtotal: Some(Decimal::new(2500, 2)),
            shipping_cost: Some(Decimal::new(785, 2)),
            amount: Decimal::new(3285, 2),
            currency: Some("USD".to_string()),
            shipping_address: None,
            tracking_number: Some("9400111899223197428490".to_string()),
        }
    }

    fn lookup(service: MockCommerceService) -> TestResult<(CartStore, OrderStatusLookup)> {
        let storage = Arc::new(MemoryStorage::new());
        let cart = CartStore::new(storage.clone(), CatalogHandle::new());

        cart.add_item(NewCartLine::new("cacao", "Ceremonial Cacao", Decimal::new(2500, 2)))?;

        let lookup = OrderStatusLookup::new(Arc::new(service), cart.clone(), OrderHistory::new(storage));

        Ok((cart, lookup))
    }

    #[tokio::test]
    async fn found_order_clears_cart_and_is_recorded() -> TestResult {
        let mut service = MockCommerceService::new();

        service
            .expect_get_order_status()
            .withf(|session_id| session_id == "cs_1")
            .times(1)
            .returning(|session_id| Ok(Some(placed(&session_id))));

        let (cart, lookup) = lookup(service)?;
        let order = lookup.lookup(" cs_1 ").await?;

        assert_eq!(order.status(), "Processing");
        assert!(cart.get_cart().is_empty());
        assert_eq!(
            lookup.history().find("cs_1").map(|entry| entry.status),
            Some("Processing".to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn blank_session_id_is_rejected_locally() -> TestResult {
        let mut service = MockCommerceService::new();

        service.expect_get_order_status().never();

        let (_cart, lookup) = lookup(service)?;
        let result = lookup.lookup("  ").await;

        assert!(matches!(result, Err(OrderStatusError::MissingSessionId)));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_order_keeps_the_cart() -> TestResult {
        let mut service = MockCommerceService::new();

        service.expect_get_order_status().returning(|_| Ok(None));

        let (cart, lookup) = lookup(service)?;
        let result = lookup.lookup("cs_404").await;

        assert!(matches!(result, Err(OrderStatusError::NotFound)));
        assert_eq!(cart.item_count(), 1);
        assert!(lookup.history().entries().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn remote_error_message_is_shown() -> TestResult {
        let mut service = MockCommerceService::new();

        service
            .expect_get_order_status()
            .returning(|_| Err(ServiceError::Remote("Sheet unavailable".to_string())));

        let (_cart, lookup) = lookup(service)?;
        let error = lookup.lookup("cs_1").await.err().ok_or("expected an error")?;

        assert_eq!(error.user_message(), "Sheet unavailable");

        Ok(())
    }
}
