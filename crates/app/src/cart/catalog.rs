//! Catalog readiness.

use std::{fs, path::Path, sync::Arc};

use agroverse::catalog::Catalog;
use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Shared handle to the product catalog, which may become available after
/// the cart is already in use.
#[derive(Debug, Clone)]
pub struct CatalogHandle {
    tx: Arc<watch::Sender<Option<Arc<Catalog>>>>,
}

impl Default for CatalogHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogHandle {
    /// A handle with no catalog yet.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);

        Self { tx: Arc::new(tx) }
    }

    /// A handle that is ready from the start.
    #[must_use]
    pub fn ready_with(catalog: Catalog) -> Self {
        let handle = Self::new();

        handle.publish(catalog);

        handle
    }

    /// Make the catalog available, waking every waiter.
    pub fn publish(&self, catalog: Catalog) {
        debug!(products = catalog.len(), "catalog published");

        self.tx.send_replace(Some(Arc::new(catalog)));
    }

    /// The catalog, if it has been published.
    #[must_use]
    pub fn current(&self) -> Option<Arc<Catalog>> {
        self.tx.borrow().clone()
    }

    /// Wait until the catalog has been published.
    pub async fn ready(&self) -> Option<Arc<Catalog>> {
        let mut rx = self.tx.subscribe();

        rx.wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|catalog| catalog.clone())
    }
}

/// Read a catalog from a JSON file keyed by product id.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| CatalogLoadError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::{io::Write as _, time::Duration};

    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn ready_resolves_once_published() {
        let handle = CatalogHandle::new();

        assert!(handle.current().is_none());

        let waiter = {
            let handle = handle.clone();

            tokio::spawn(async move { handle.ready().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        handle.publish(Catalog::default());

        let catalog = waiter.await.ok().flatten();

        assert!(catalog.is_some());
        assert!(handle.current().is_some());
    }

    #[tokio::test]
    async fn ready_returns_immediately_when_already_published() {
        let handle = CatalogHandle::ready_with(Catalog::default());

        assert!(handle.ready().await.is_some());
    }

    #[test]
    fn loads_catalog_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;

        write!(
            file,
            r#"{{"nibs":{{"productId":"nibs","name":"Cacao Nibs","price":12.5,"weight":8}}}}"#
        )?;

        let catalog = load_catalog(file.path())?;

        assert_eq!(catalog.len(), 1);
        assert!(catalog.weight_of("nibs").is_some());

        Ok(())
    }

    #[test]
    fn missing_catalog_file_is_an_io_error() {
        let result = load_catalog(Path::new("/nonexistent/catalog.json"));

        assert!(matches!(result, Err(CatalogLoadError::Io { .. })));
    }
}
