//! Product pricing lookups.
//!
//! Cart mutations price their lines from the catalog. The lookup happens before any ledger transaction is opened,
//! so a slow catalog can never hold the cart's write lock.
mod config;
mod errors;
mod http_catalog;
mod product;

pub use config::CatalogConfig;
pub use errors::CatalogError;
pub use http_catalog::HttpCatalog;
pub use product::Product;

use crate::db_types::ProductId;

#[allow(async_fn_in_trait)]
pub trait CatalogLookup {
    /// Fetches the current price of a product.
    ///
    /// Returns [`CatalogError::ProductNotFound`] if the catalog does not know the product, and
    /// [`CatalogError::Unavailable`] if the catalog could not be reached or did not answer in time.
    async fn fetch_product(&self, product_id: &ProductId) -> Result<Product, CatalogError>;
}
