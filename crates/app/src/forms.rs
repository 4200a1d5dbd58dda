//! Checkout form persistence.

use std::{sync::Arc, time::Duration};

use agroverse::{address::DEFAULT_COUNTRY, checkout::CheckoutForm};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    debounce::Debouncer,
    storage::{CHECKOUT_INFO_KEY, Storage, StorageError, read_json, write_json},
};

/// Quiet period before typed input is saved.
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(500);

/// Saved checkout details, restored on the next visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedShippingInfo {
    /// Saved form fields
    #[serde(flatten)]
    pub form: CheckoutForm,

    /// When the record was written
    pub last_updated: Timestamp,
}

/// Reads and writes the saved checkout form.
#[derive(Debug, Clone)]
pub struct FormStore {
    storage: Arc<dyn Storage>,
}

impl FormStore {
    /// Store over `storage`.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Save the form, defaulting a blank country.
    ///
    /// # Errors
    ///
    /// Returns an error when the record cannot be written.
    pub fn save(&self, form: &CheckoutForm) -> Result<SavedShippingInfo, StorageError> {
        let mut form = form.clone();

        if form.country.trim().is_empty() {
            form.country = DEFAULT_COUNTRY.to_string();
        }

        let record = SavedShippingInfo {
            form,
            last_updated: Timestamp::now(),
        };

        write_json(self.storage.as_ref(), CHECKOUT_INFO_KEY, &record)?;

        Ok(record)
    }

    /// The saved record, if there is a readable one.
    pub fn load(&self) -> Option<SavedShippingInfo> {
        read_json(self.storage.as_ref(), CHECKOUT_INFO_KEY).unwrap_or_else(|error| {
            warn!("ignoring saved checkout info: {error}");

            None
        })
    }
}

/// Copy every non-empty saved field into `form`, leaving the rest untouched.
pub fn populate(form: &mut CheckoutForm, saved: &SavedShippingInfo) {
    let pairs = [
        (&mut form.full_name, &saved.form.full_name),
        (&mut form.email, &saved.form.email),
        (&mut form.phone, &saved.form.phone),
        (&mut form.address, &saved.form.address),
        (&mut form.city, &saved.form.city),
        (&mut form.state, &saved.form.state),
        (&mut form.zip, &saved.form.zip),
        (&mut form.country, &saved.form.country),
    ];

    for (field, value) in pairs {
        if !value.is_empty() {
            field.clone_from(value);
        }
    }
}

/// Saves the form shortly after typing stops, and at once on submit.
#[derive(Debug)]
pub struct FormAutosave {
    store: FormStore,
    debouncer: Debouncer<CheckoutForm>,
}

impl FormAutosave {
    /// Autosave with the standard quiet period.
    pub fn new(store: FormStore) -> Self {
        Self::with_delay(store, AUTOSAVE_DELAY)
    }

    /// Autosave with a custom quiet period.
    pub fn with_delay(store: FormStore, delay: Duration) -> Self {
        let background = store.clone();

        let debouncer = Debouncer::new(delay, move |form: CheckoutForm| {
            if let Err(error) = background.save(&form) {
                warn!("failed to autosave checkout info: {error}");
            }

            async {}
        });

        Self { store, debouncer }
    }

    /// Record typed input; saved once input pauses.
    pub fn on_input(&self, form: &CheckoutForm) {
        self.debouncer.trigger(form.clone());
    }

    /// Save immediately, dropping any pending autosave.
    ///
    /// # Errors
    ///
    /// Returns an error when the record cannot be written.
    pub fn on_submit(&self, form: &CheckoutForm) -> Result<SavedShippingInfo, StorageError> {
        self.debouncer.cancel();

        self.store.save(form)
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &FormStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use tokio::time::sleep;

    use crate::storage::MemoryStorage;

    use super::*;

    fn form() -> CheckoutForm {
        CheckoutForm {
            full_name: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            phone: "5105550100".to_string(),
            address: "1 Cacao Way".to_string(),
            city: "Oakland".to_string(),
            state: "CA".to_string(),
            zip: "94607".to_string(),
            country: String::new(),
        }
    }

    fn store() -> (Arc<MemoryStorage>, FormStore) {
        let storage = Arc::new(MemoryStorage::new());

        (storage.clone(), FormStore::new(storage))
    }

    #[test]
    fn save_defaults_country_and_stamps_time() -> TestResult {
        let (storage, store) = store();

        store.save(&form())?;

        let raw: serde_json::Value =
            serde_json::from_str(&storage.get(CHECKOUT_INFO_KEY)?.unwrap_or_default())?;

        assert_eq!(raw["country"], "US");
        assert_eq!(raw["fullName"], "Ana Souza");
        assert!(raw["lastUpdated"].is_string());

        assert_eq!(store.load().map(|saved| saved.form.country), Some("US".to_string()));

        Ok(())
    }

    #[test]
    fn unreadable_record_loads_as_none() -> TestResult {
        let (storage, store) = store();

        assert_eq!(store.load(), None);

        storage.set(CHECKOUT_INFO_KEY, "not json")?;

        assert_eq!(store.load(), None);

        Ok(())
    }

    #[test]
    fn populate_only_fills_non_empty_fields() {
        let saved = SavedShippingInfo {
            form: CheckoutForm {
                phone: String::new(),
                ..form()
            },
            last_updated: Timestamp::now(),
        };

        let mut current = CheckoutForm {
            phone: "4155550100".to_string(),
            city: "Berkeley".to_string(),
            ..CheckoutForm::default()
        };

        populate(&mut current, &saved);

        assert_eq!(current.phone, "4155550100");
        assert_eq!(current.city, "Oakland");
        assert_eq!(current.full_name, "Ana Souza");
    }

    #[tokio::test(start_paused = true)]
    async fn input_is_saved_after_the_quiet_period() {
        let (_storage, store) = store();
        let autosave = FormAutosave::new(store);

        autosave.on_input(&form());
        sleep(Duration::from_millis(400)).await;

        assert_eq!(autosave.store().load(), None);

        sleep(Duration::from_millis(200)).await;

        assert_eq!(
            autosave.store().load().map(|saved| saved.form.full_name),
            Some("Ana Souza".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn submit_saves_immediately_and_cancels_pending_input() -> TestResult {
        let (_storage, store) = store();
        let autosave = FormAutosave::new(store);

        autosave.on_input(&CheckoutForm {
            full_name: "Stale".to_string(),
            ..form()
        });
        autosave.on_submit(&form())?;

        assert_eq!(
            autosave.store().load().map(|saved| saved.form.full_name),
            Some("Ana Souza".to_string())
        );

        sleep(Duration::from_secs(1)).await;

        assert_eq!(
            autosave.store().load().map(|saved| saved.form.full_name),
            Some("Ana Souza".to_string())
        );

        Ok(())
    }
}
