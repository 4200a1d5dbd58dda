//! Debounced callbacks.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use tokio::task::JoinHandle;

type Callback<T> = Arc<dyn Fn(T) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Runs a callback once input has been quiet for a fixed delay.
///
/// Each `trigger` cancels the pending run and schedules a new one with the
/// latest value. Must be used from within a tokio runtime.
pub struct Debouncer<T> {
    delay: Duration,
    callback: Callback<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Debounce `callback` by `delay`.
    pub fn new<F, Fut>(delay: Duration, callback: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            delay,
            callback: Arc::new(move |value| Box::pin(callback(value))),
            pending: Mutex::new(None),
        }
    }

    /// Schedule the callback with `value`, replacing any pending run.
    pub fn trigger(&self, value: T) {
        let delay = self.delay;
        let callback = Arc::clone(&self.callback);

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback(value).await;
        });

        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(task);

        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Drop the pending run, if any.
    pub fn cancel(&self) {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(task) = pending {
            task.abort();
        }
    }

    /// Whether a scheduled run has not finished yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(task) = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
    }
}

impl<T> Debug for Debouncer<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}
