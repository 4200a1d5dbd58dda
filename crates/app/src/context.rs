//! App Context

use std::sync::Arc;

use agroverse::environment::Environment;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
    cart::{CartStore, CatalogHandle, CatalogLoadError, load_catalog},
    checkout::{CheckoutOrchestrator, Navigator},
    config::StorefrontConfig,
    forms::{FormAutosave, FormStore},
    orders::{OrderHistory, OrderStatusLookup},
    quotes::QuoteRequests,
    service::{CommerceService, HttpCommerceService, ServiceError},
    shipping::ShippingNegotiator,
    storage::{FileStorage, Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to open data directory")]
    Storage(#[from] StorageError),

    #[error("failed to load product catalog")]
    Catalog(#[from] CatalogLoadError),

    #[error("failed to build commerce service client")]
    Service(#[from] ServiceError),
}

/// Everything one storefront session shares.
#[derive(Clone)]
pub struct AppContext {
    pub environment: Environment,
    pub storage: Arc<dyn Storage>,
    pub catalog: CatalogHandle,
    pub cart: CartStore,
    pub service: Arc<dyn CommerceService>,
    pub shipping: Arc<ShippingNegotiator>,
    pub forms: Arc<FormAutosave>,
    pub history: OrderHistory,
}

impl AppContext {
    /// Build a context from configuration: file storage in the data
    /// directory, the HTTP service client and, when given, the catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error when the data directory, catalog or HTTP client
    /// cannot be set up.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, AppInitError> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(&config.data_dir)?);
        let service: Arc<dyn CommerceService> =
            Arc::new(HttpCommerceService::new(config.service_config())?);

        let catalog = match &config.catalog {
            Some(path) => CatalogHandle::ready_with(load_catalog(path)?),
            None => {
                debug!("no catalog configured, weights come from cart lines only");

                CatalogHandle::new()
            }
        };

        Ok(Self::new(storage, service, catalog, config.environment()))
    }

    /// Assemble a context from its parts.
    pub fn new(
        storage: Arc<dyn Storage>,
        service: Arc<dyn CommerceService>,
        catalog: CatalogHandle,
        environment: Environment,
    ) -> Self {
        let cart = CartStore::new(Arc::clone(&storage), catalog.clone());
        let shipping = Arc::new(ShippingNegotiator::new(
            Arc::clone(&service),
            cart.clone(),
            environment,
        ));
        let forms = Arc::new(FormAutosave::new(FormStore::new(Arc::clone(&storage))));
        let history = OrderHistory::new(Arc::clone(&storage));

        Self {
            environment,
            storage,
            catalog,
            cart,
            service,
            shipping,
            forms,
            history,
        }
    }

    /// Reconcile cart weights once the catalog arrives.
    pub fn spawn_weight_reconciliation(&self) -> JoinHandle<()> {
        let cart = self.cart.clone();

        tokio::spawn(async move {
            if let Err(reconcile_error) = cart.reconcile_when_ready().await {
                warn!("weight reconciliation failed: {reconcile_error}");
            }
        })
    }

    /// Checkout for this session, redirecting through `navigator`.
    pub fn checkout(&self, navigator: Arc<dyn Navigator>) -> CheckoutOrchestrator {
        CheckoutOrchestrator::new(
            Arc::clone(&self.service),
            self.cart.clone(),
            Arc::clone(&self.shipping),
            Arc::clone(&self.forms),
            navigator,
            self.environment,
        )
    }

    pub fn order_status(&self) -> OrderStatusLookup {
        OrderStatusLookup::new(Arc::clone(&self.service), self.cart.clone(), self.history.clone())
    }

    pub fn quotes(&self) -> QuoteRequests {
        QuoteRequests::new(Arc::clone(&self.service), self.environment)
    }
}
