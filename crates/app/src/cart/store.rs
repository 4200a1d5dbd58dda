//! Persistent cart store.

use std::sync::{Arc, Mutex, PoisonError};

use agroverse::cart::{Cart, NewCartLine};
use jiff::Timestamp;
use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::{
    cart::{CartStoreError, CatalogHandle},
    storage::{CART_KEY, Storage, StorageError, read_json, write_json},
};

/// The cart as persisted in local storage.
///
/// Every read goes back to storage, so several stores sharing one backend
/// see each other's writes (last write wins). Successful writes publish the
/// new cart to subscribers.
#[derive(Debug, Clone)]
pub struct CartStore {
    storage: Arc<dyn Storage>,
    catalog: CatalogHandle,
    changes: Arc<watch::Sender<Cart>>,
    write_lock: Arc<Mutex<()>>,
}

impl CartStore {
    /// Create a store over `storage`, using `catalog` to fill in missing weights.
    pub fn new(storage: Arc<dyn Storage>, catalog: CatalogHandle) -> Self {
        let initial = load(storage.as_ref());
        let (changes, _rx) = watch::channel(initial);

        Self {
            storage,
            catalog,
            changes: Arc::new(changes),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Catalog used for weight reconciliation.
    #[must_use]
    pub fn catalog(&self) -> &CatalogHandle {
        &self.catalog
    }

    /// Subscribe to cart snapshots published after each saved change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.changes.subscribe()
    }

    /// Current cart. A missing or unparsable stored cart is replaced with a
    /// fresh one, which is saved so its session id stays stable. When the
    /// backend itself cannot be read, the fresh cart is returned unsaved.
    pub fn get_cart(&self) -> Cart {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        match read_json::<Cart>(self.storage.as_ref(), CART_KEY) {
            Ok(Some(cart)) => cart.normalized(),
            Ok(None) => self.save_fresh_cart(),
            Err(read_error @ StorageError::Parse { .. }) => {
                warn!("replacing unreadable cart: {read_error}");

                self.save_fresh_cart()
            }
            Err(read_error) => {
                warn!("failed to read cart: {read_error}");

                Cart::empty(Timestamp::now())
            }
        }
    }

    /// Add a product, merging with an existing line.
    ///
    /// A line added without a weight takes the catalog weight when the
    /// catalog is ready.
    ///
    /// # Errors
    ///
    /// Returns `InvalidItem` for a line without id, name or positive price, and
    /// `Storage` when the cart cannot be saved.
    pub fn add_item(&self, mut item: NewCartLine) -> Result<Cart, CartStoreError> {
        if item.weight.is_zero()
            && let Some(weight) = self
                .catalog
                .current()
                .and_then(|catalog| catalog.weight_of(&item.product_id))
        {
            item.weight = weight;
        }

        self.update(|cart| {
            cart.add(item)?;

            Ok(true)
        })
    }

    /// Remove a product's line. Removing a product that isn't in the cart succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Storage` when the cart cannot be saved.
    pub fn remove_item(&self, product_id: &str) -> Result<Cart, CartStoreError> {
        self.update(|cart| {
            cart.remove(product_id);

            Ok(true)
        })
    }

    /// Set a line's quantity; zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns `NotInCart` when the product has no line, and `Storage` when the
    /// cart cannot be saved.
    pub fn set_quantity(&self, product_id: &str, quantity: i64) -> Result<Cart, CartStoreError> {
        self.update(|cart| {
            cart.set_quantity(product_id, quantity)?;

            Ok(true)
        })
    }

    /// Replace the cart with an empty one under a new session id.
    ///
    /// # Errors
    ///
    /// Returns `Storage` when the cart cannot be saved.
    pub fn clear(&self) -> Result<Cart, CartStoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let cart = Cart::empty(Timestamp::now());

        self.persist(&cart)?;

        Ok(cart)
    }

    /// Total units in the cart.
    pub fn item_count(&self) -> u64 {
        self.get_cart().item_count()
    }

    /// Sum of price times quantity.
    pub fn subtotal(&self) -> Decimal {
        self.get_cart().subtotal()
    }

    /// Fill zero weights from the catalog. Returns whether the cart changed.
    ///
    /// Nothing is written when the catalog isn't ready or no line needs a weight.
    ///
    /// # Errors
    ///
    /// Returns `Storage` when the updated cart cannot be saved.
    pub fn reconcile_weights(&self) -> Result<bool, CartStoreError> {
        let Some(catalog) = self.catalog.current() else {
            debug!("catalog not ready, skipping weight reconciliation");

            return Ok(false);
        };

        let mut changed = false;

        self.update(|cart| {
            changed = cart.has_missing_weights() && cart.backfill_weights(&catalog);

            Ok(changed)
        })?;

        Ok(changed)
    }

    /// Wait for the catalog, then reconcile weights once.
    ///
    /// # Errors
    ///
    /// Returns `Storage` when the updated cart cannot be saved.
    pub async fn reconcile_when_ready(&self) -> Result<bool, CartStoreError> {
        if self.catalog.ready().await.is_none() {
            return Ok(false);
        }

        self.reconcile_weights()
    }

    /// Read, apply `change`, and save when it reports a modification.
    fn update<F>(&self, change: F) -> Result<Cart, CartStoreError>
    where
        F: FnOnce(&mut Cart) -> Result<bool, CartStoreError>,
    {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut cart = load(self.storage.as_ref());

        if change(&mut cart)? {
            cart.touch(Timestamp::now());
            self.persist(&cart)?;
        }

        Ok(cart)
    }

    fn save_fresh_cart(&self) -> Cart {
        let cart = Cart::empty(Timestamp::now());

        if let Err(store_error) = write_json(self.storage.as_ref(), CART_KEY, &cart) {
            warn!("failed to save new cart: {store_error}");
        }

        cart
    }

    fn persist(&self, cart: &Cart) -> Result<(), StorageError> {
        if let Err(store_error) = write_json(self.storage.as_ref(), CART_KEY, cart) {
            error!("failed to save cart {}: {store_error}", cart.session_id);

            return Err(store_error);
        }

        self.changes.send_replace(cart.clone());

        Ok(())
    }
}

fn load(storage: &dyn Storage) -> Cart {
    match read_json::<Cart>(storage, CART_KEY) {
        Ok(Some(cart)) => cart.normalized(),
        Ok(None) => Cart::empty(Timestamp::now()),
        Err(read_error) => {
            warn!("discarding unreadable cart: {read_error}");

            Cart::empty(Timestamp::now())
        }
    }
}
