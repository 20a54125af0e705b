use thiserror::Error;

use crate::db_types::CartId;

#[derive(Debug, Clone, Error)]
pub enum CartSourceError {
    #[error("Could not initialize the cart service client: {0}")]
    Initialization(String),
    #[error("Cart {0} was not found")]
    CartNotFound(CartId),
    #[error("The cart store is unavailable: {0}")]
    Unavailable(String),
}
