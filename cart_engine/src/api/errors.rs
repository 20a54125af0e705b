use thiserror::Error;

use crate::{
    cart_source::CartSourceError,
    catalog::CatalogError,
    db::traits::LedgerError,
    db_types::{CartId, OrderId, OrderStatusType, ProductId, UserId},
};

#[derive(Debug, Clone, Error)]
pub enum CartApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Product {0} was not found")]
    ProductNotFound(ProductId),
    #[error("The catalog is unavailable: {0}")]
    CatalogUnavailable(String),
    #[error("User {0} has no open cart")]
    CartNotFound(UserId),
    #[error("Product {0} is not in the cart")]
    ItemNotInCart(ProductId),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<CatalogError> for CartApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::ProductNotFound(id) => CartApiError::ProductNotFound(id),
            CatalogError::Unavailable(s) | CatalogError::Initialization(s) => CartApiError::CatalogUnavailable(s),
        }
    }
}

impl From<LedgerError> for CartApiError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::NoOpenCart(user_id) => CartApiError::CartNotFound(user_id),
            LedgerError::ItemNotInCart { product_id, .. } => CartApiError::ItemNotInCart(product_id),
            e @ LedgerError::QuantityTooLarge { .. } => CartApiError::InvalidInput(e.to_string()),
            other => CartApiError::DatabaseError(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Cart {0} was not found")]
    CartNotFound(CartId),
    #[error("Cart {cart_id} has already been ordered as order {order_id}")]
    CartAlreadyOrdered { cart_id: CartId, order_id: OrderId },
    #[error("The cart store is unavailable: {0}")]
    CartStoreUnavailable(String),
    #[error("Order {0} was not found")]
    OrderNotFound(OrderId),
    #[error("User {0} has no orders")]
    NoOrdersFound(UserId),
    #[error("Order cannot move from {from} to {to}")]
    ForbiddenStatusChange { from: OrderStatusType, to: OrderStatusType },
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<CartSourceError> for OrderApiError {
    fn from(e: CartSourceError) -> Self {
        match e {
            CartSourceError::CartNotFound(id) => OrderApiError::CartNotFound(id),
            CartSourceError::Unavailable(s) | CartSourceError::Initialization(s) => {
                OrderApiError::CartStoreUnavailable(s)
            },
        }
    }
}

impl From<LedgerError> for OrderApiError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::DuplicateOrder { cart_id, order_id } => OrderApiError::CartAlreadyOrdered { cart_id, order_id },
            LedgerError::OrderDoesNotExist(id) => OrderApiError::OrderNotFound(id),
            LedgerError::CartDoesNotExist(id) | LedgerError::EmptyCart(id) => OrderApiError::CartNotFound(id),
            LedgerError::ForbiddenStatusChange { from, to, .. } => OrderApiError::ForbiddenStatusChange { from, to },
            other => OrderApiError::DatabaseError(other.to_string()),
        }
    }
}
