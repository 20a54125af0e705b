use thiserror::Error;

use crate::db_types::{CartId, Money, OrderId, OrderStatusType, ProductId, UserId};

#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("User {0} has no open cart")]
    NoOpenCart(UserId),
    #[error("Cart {0} does not exist")]
    CartDoesNotExist(CartId),
    #[error("Product {product_id} is not in cart {cart_id}")]
    ItemNotInCart { cart_id: CartId, product_id: ProductId },
    #[error("{quantity} units at {unit_price} are more than a cart line can hold")]
    QuantityTooLarge { quantity: i64, unit_price: Money },
    #[error("Cart {0} has no items")]
    EmptyCart(CartId),
    #[error("Cart {cart_id} has already been ordered as order {order_id}")]
    DuplicateOrder { cart_id: CartId, order_id: OrderId },
    #[error("Order {0} does not exist")]
    OrderDoesNotExist(OrderId),
    #[error("Order {order_id} cannot move from {from} to {to}")]
    ForbiddenStatusChange { order_id: OrderId, from: OrderStatusType, to: OrderStatusType },
}
