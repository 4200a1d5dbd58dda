//! Checkout submission.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use agroverse::{checkout::CheckoutForm, environment::Environment};
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::{
    cart::CartStore,
    checkout::{CheckoutError, Navigator},
    forms::FormAutosave,
    service::{CheckoutRequest, CommerceService},
    shipping::ShippingNegotiator,
};

const SUBMIT_LABEL: &str = "Continue to Payment";
const PROCESSING_LABEL: &str = "Processing...";

/// Where a checkout attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutPhase {
    #[default]
    Editing,
    Validating,
    Submitting,

    /// Handed off to the payment page; nothing further happens here.
    Redirecting,
}

impl CheckoutPhase {
    fn is_busy(self) -> bool {
        self != Self::Editing
    }
}

/// State of the form inputs and submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormControls {
    pub inputs_enabled: bool,
    pub submit_label: &'static str,
}

impl FormControls {
    fn for_phase(phase: CheckoutPhase) -> Self {
        match phase {
            CheckoutPhase::Submitting | CheckoutPhase::Redirecting => Self {
                inputs_enabled: false,
                submit_label: PROCESSING_LABEL,
            },
            CheckoutPhase::Editing | CheckoutPhase::Validating => Self {
                inputs_enabled: true,
                submit_label: SUBMIT_LABEL,
            },
        }
    }
}

impl Default for FormControls {
    fn default() -> Self {
        Self::for_phase(CheckoutPhase::Editing)
    }
}

/// Snapshot of the checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckoutView {
    pub phase: CheckoutPhase,
    pub controls: FormControls,

    /// Messages from the last failed attempt.
    pub errors: Vec<String>,

    /// The shipping options need the shopper's attention.
    pub scroll_to_shipping: bool,
}

/// Drives a checkout from validation to the payment redirect.
pub struct CheckoutOrchestrator {
    service: Arc<dyn CommerceService>,
    cart: CartStore,
    shipping: Arc<ShippingNegotiator>,
    autosave: Arc<FormAutosave>,
    navigator: Arc<dyn Navigator>,
    environment: Environment,
    view: watch::Sender<CheckoutView>,
}

impl CheckoutOrchestrator {
    /// Orchestrator over the shared cart, shipping and form state.
    pub fn new(
        service: Arc<dyn CommerceService>,
        cart: CartStore,
        shipping: Arc<ShippingNegotiator>,
        autosave: Arc<FormAutosave>,
        navigator: Arc<dyn Navigator>,
        environment: Environment,
    ) -> Self {
        let (view, _rx) = watch::channel(CheckoutView::default());

        Self {
            service,
            cart,
            shipping,
            autosave,
            navigator,
            environment,
            view,
        }
    }

    /// Subscribe to page updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CheckoutView> {
        self.view.subscribe()
    }

    /// The current page state.
    #[must_use]
    pub fn view(&self) -> CheckoutView {
        self.view.borrow().clone()
    }

    /// Validate `form` and, if everything checks out, create a checkout
    /// session and navigate to it. Returns the checkout URL.
    ///
    /// # Errors
    ///
    /// Returns `AlreadySubmitting` while another attempt is running. Every
    /// other error returns the page to `Editing` with the messages shown.
    pub async fn submit(&self, form: &CheckoutForm) -> Result<String, CheckoutError> {
        let started = self.view.send_if_modified(|view| {
            if view.phase.is_busy() {
                return false;
            }

            *view = CheckoutView {
                phase: CheckoutPhase::Validating,
                ..CheckoutView::default()
            };

            true
        });

        if !started {
            return Err(CheckoutError::AlreadySubmitting);
        }

        match self.attempt(form).await {
            Ok(url) => {
                self.enter(CheckoutPhase::Redirecting);
                self.navigator.navigate(&url);

                Ok(url)
            }
            Err(checkout_error) => {
                let scroll_to_shipping = matches!(checkout_error, CheckoutError::NoShippingSelected);

                self.view.send_replace(CheckoutView {
                    errors: checkout_error.user_messages(),
                    scroll_to_shipping,
                    ..CheckoutView::default()
                });

                Err(checkout_error)
            }
        }
    }

    async fn attempt(&self, form: &CheckoutForm) -> Result<String, CheckoutError> {
        form.validate()?;

        if self.cart.get_cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let selected = self
            .shipping
            .selected_rate()
            .await
            .ok_or(CheckoutError::NoShippingSelected)?;

        self.enter(CheckoutPhase::Submitting);

        if let Err(reconcile_error) = self.cart.reconcile_weights() {
            warn!("weight reconciliation failed before checkout: {reconcile_error}");
        }

        let cart = self.cart.get_cart();

        if let Err(save_error) = self.autosave.on_submit(form) {
            warn!("failed to save checkout info: {save_error}");
        }

        info!(
            session_id = cart.session_id.as_str(),
            items = cart.item_count(),
            rate = selected.id.as_str(),
            "creating checkout session"
        );

        let request = CheckoutRequest {
            environment: self.environment,
            cart,
            customer: form.clone(),
            selected_rate_id: Some(selected.id),
        };

        self.service
            .create_checkout_session(request)
            .await
            .map_err(|service_error| {
                error!("checkout session failed: {service_error}");

                CheckoutError::from(service_error)
            })
    }

    fn enter(&self, phase: CheckoutPhase) {
        self.view.send_modify(|view| {
            view.phase = phase;
            view.controls = FormControls::for_phase(phase);
        });
    }
}

impl Debug for CheckoutOrchestrator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CheckoutOrchestrator")
            .field("environment", &self.environment)
            .field("phase", &self.view.borrow().phase)
            .finish_non_exhaustive()
    }
}
