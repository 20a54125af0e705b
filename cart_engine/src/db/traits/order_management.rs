use crate::{
    db::traits::LedgerError,
    db_types::{NewOrder, Order, OrderId, OrderStatusType, UserId},
};

/// The `OrderManagement` trait defines the behaviour for creating, querying and progressing orders.
#[allow(async_fn_in_trait)]
pub trait OrderManagement: Clone {
    /// Stores a new order for a cart and closes the cart, atomically.
    ///
    /// If an order already exists for the cart, nothing is written and [`LedgerError::DuplicateOrder`] is returned.
    /// A cart held in this ledger that has no lines by the time it is closed fails with [`LedgerError::EmptyCart`].
    async fn insert_order_for_cart(&self, order: NewOrder) -> Result<OrderId, LedgerError>;

    async fn fetch_order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, LedgerError>;

    /// All orders for the user, newest first.
    async fn fetch_orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, LedgerError>;

    /// Moves an order to `status`, provided its current status is an allowed predecessor.
    ///
    /// Fails with [`LedgerError::OrderDoesNotExist`] or [`LedgerError::ForbiddenStatusChange`].
    async fn update_order_status(&self, order_id: &OrderId, status: OrderStatusType) -> Result<Order, LedgerError>;
}
