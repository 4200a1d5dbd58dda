//! Cart

mod catalog;
pub mod errors;
mod store;

pub use catalog::{CatalogHandle, CatalogLoadError, load_catalog};
pub use errors::CartStoreError;
pub use store::CartStore;
