//! Local order history.

use std::sync::Arc;

use agroverse::orders::{Order, OrderSummary};
use tracing::{debug, warn};

use crate::storage::{ORDER_HISTORY_KEY, Storage, StorageError, read_json, write_json};

/// Most orders kept.
pub const MAX_ORDERS: usize = 50;

/// Orders the shopper has looked up on this device, newest first.
#[derive(Debug, Clone)]
pub struct OrderHistory {
    storage: Arc<dyn Storage>,
}

impl OrderHistory {
    /// History stored in `storage`.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Every entry. Missing or unreadable history reads as empty.
    pub fn entries(&self) -> Vec<OrderSummary> {
        read_json(self.storage.as_ref(), ORDER_HISTORY_KEY)
            .unwrap_or_else(|error| {
                warn!("ignoring unreadable order history: {error}");

                None
            })
            .unwrap_or_default()
    }

    /// Add or refresh `order`. New orders go to the front; known ones are
    /// updated where they stand.
    ///
    /// # Errors
    ///
    /// Returns an error when the history cannot be saved.
    pub fn record(&self, order: &Order) -> Result<Vec<OrderSummary>, StorageError> {
        let summary = OrderSummary::from(order);
        let mut entries = self.entries();

        match entries
            .iter_mut()
            .find(|entry| entry.session_id == summary.session_id)
        {
            Some(existing) => *existing = summary,
            None => entries.insert(0, summary),
        }

        entries.truncate(MAX_ORDERS);

        write_json(self.storage.as_ref(), ORDER_HISTORY_KEY, &entries)?;

        debug!(session_id = order.session_id.as_str(), entries = entries.len(), "order history saved");

        Ok(entries)
    }

    /// Entry for `session_id`.
    pub fn find(&self, session_id: &str) -> Option<OrderSummary> {
        self.entries()
            .into_iter()
            .find(|entry| entry.session_id == session_id)
    }

    /// Forget every entry.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored history cannot be removed.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(ORDER_HISTORY_KEY)
    }

    /// Up to `limit` newest entries other than `excluding`.
    pub fn recent(&self, excluding: Option<&str>, limit: usize) -> Vec<OrderSummary> {
        self.entries()
            .into_iter()
            .filter(|entry| Some(entry.session_id.as_str()) != excluding)
            .take(limit)
            .collect()
    }
}
