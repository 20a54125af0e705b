use std::{fmt::Debug, str::FromStr};

use log::*;

use crate::{
    api::errors::OrderApiError,
    cart_source::{CartSource, Credentials},
    db::traits::OrderManagement,
    db_types::{CartId, NewOrder, Order, OrderId, OrderStatusType, UserId},
};

/// `OrderApi` turns carts into orders and moves orders through their lifecycle.
#[derive(Clone)]
pub struct OrderApi<B, S> {
    db: B,
    carts: S,
}

impl<B, S> Debug for OrderApi<B, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderApi")
    }
}

impl<B, S> OrderApi<B, S> {
    pub fn new(db: B, carts: S) -> Self {
        Self { db, carts }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}

impl<B, S> OrderApi<B, S>
where
    B: OrderManagement,
    S: CartSource,
{
    /// Places a pending order for the caller's cart and closes the cart.
    ///
    /// The cart must exist, belong to the caller and hold at least one line. A cart can be ordered only once; a
    /// second attempt fails with [`OrderApiError::CartAlreadyOrdered`] and writes nothing.
    pub async fn create_order(&self, cart_id: &CartId, credentials: &Credentials) -> Result<OrderId, OrderApiError> {
        if cart_id.is_blank() {
            return Err(OrderApiError::InvalidInput("Need to provide a cart parameter.".into()));
        }
        let cart = self.carts.fetch_cart(cart_id, credentials).await?;
        if cart.is_empty() {
            debug!("📦️ Cart {cart_id} is empty. Not creating an order");
            return Err(OrderApiError::CartNotFound(cart_id.clone()));
        }
        let order = NewOrder::new(cart.cart.id.clone(), cart.cart.user_id.clone());
        let id = self.db.insert_order_for_cart(order).await?;
        info!("📦️ Order {id} placed by {} for cart {cart_id}", credentials.user_id);
        Ok(id)
    }

    /// Moves an order to a new status. `new_status` must name one of the order statuses.
    pub async fn update_order_status(&self, order_id: &OrderId, new_status: &str) -> Result<Order, OrderApiError> {
        if order_id.is_blank() {
            return Err(OrderApiError::InvalidInput("Need to provide an order parameter.".into()));
        }
        let status = OrderStatusType::from_str(new_status).map_err(|e| {
            OrderApiError::InvalidInput(format!("{e}. Expected one of pending, shipped, delivered or cancelled."))
        })?;
        let order = self.db.update_order_status(order_id, status).await?;
        info!("📦️ Order {order_id} is now {status}");
        Ok(order)
    }

    pub async fn find_order_by_id(&self, order_id: &OrderId) -> Result<Order, OrderApiError> {
        self.db.fetch_order_by_id(order_id).await?.ok_or_else(|| OrderApiError::OrderNotFound(order_id.clone()))
    }

    /// Like [`Self::find_order_by_id`], but orders placed by anyone other than `user_id` are reported as not found.
    pub async fn find_order_for_user(&self, order_id: &OrderId, user_id: &UserId) -> Result<Order, OrderApiError> {
        let order = self.find_order_by_id(order_id).await?;
        if &order.user_id != user_id {
            debug!("📦️ {user_id} asked for order {order_id}, which belongs to someone else");
            return Err(OrderApiError::OrderNotFound(order_id.clone()));
        }
        Ok(order)
    }

    /// All of the user's orders, newest first. A user with no orders gets [`OrderApiError::NoOrdersFound`].
    pub async fn find_all_orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderApiError> {
        let orders = self.db.fetch_orders_for_user(user_id).await?;
        if orders.is_empty() {
            return Err(OrderApiError::NoOrdersFound(user_id.clone()));
        }
        Ok(orders)
    }
}
