use thiserror::Error;

use crate::db_types::ProductId;

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Could not initialize the catalog client: {0}")]
    Initialization(String),
    #[error("Product {0} was not found in the catalog")]
    ProductNotFound(ProductId),
    #[error("The catalog is unavailable: {0}")]
    Unavailable(String),
}
