use std::fmt::Debug;

use log::*;
use sqlx::{migrate, SqliteConnection, SqlitePool};

use super::{cart_items, carts, new_pool, orders, SqliteDatabaseError};
use crate::{
    db::traits::{CartManagement, InsertOrderResult, LedgerError, OrderManagement},
    db_types::{
        CartId,
        CartMutation,
        CartRetrieval,
        CartTotals,
        CartWithItems,
        Money,
        NewOrder,
        Order,
        OrderId,
        OrderStatusType,
        ProductId,
        Reconciliation,
        UserId,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    /// Returns a reference to the database connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date.
    pub async fn run_migrations(&self) -> Result<(), SqliteDatabaseError> {
        migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Migrations complete for {}", self.url);
        Ok(())
    }

    /// Closes the database connection pool
    pub async fn close(&mut self) -> Result<(), SqliteDatabaseError> {
        self.pool.close().await;
        Ok(())
    }
}

async fn cart_with_items(
    cart_id: &CartId,
    conn: &mut SqliteConnection,
) -> Result<Option<CartWithItems>, SqliteDatabaseError> {
    let Some(cart) = carts::fetch_cart(cart_id, conn).await? else {
        return Ok(None);
    };
    let items = cart_items::fetch_items(cart_id, conn).await?;
    Ok(Some(CartWithItems { cart, items }))
}

impl CartManagement for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn add_item_to_open_cart(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        unit_price: Money,
    ) -> Result<CartMutation, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let (cart_id, cart_created) = carts::lock_or_create_open_cart(user_id, &mut tx).await?;
        let (item, quantity_delta, price_delta) = match cart_items::fetch_item(&cart_id, product_id, &mut tx).await? {
            Some(existing) => {
                let quantity = existing.quantity.checked_add(1).ok_or(LedgerError::QuantityTooLarge {
                    quantity: existing.quantity,
                    unit_price,
                })?;
                let item = cart_items::update_item(&existing.id, quantity, unit_price, &mut tx).await?;
                (item.clone(), 1, item.total_price - existing.total_price)
            },
            None => {
                let item = cart_items::insert_item(&cart_id, product_id, 1, unit_price, &mut tx).await?;
                (item.clone(), 1, item.total_price)
            },
        };
        carts::adjust_totals(&cart_id, quantity_delta, price_delta, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Added {product_id} to cart {cart_id} for {user_id}. Line now holds {}", item.quantity);
        Ok(CartMutation {
            cart_id,
            product_id: product_id.clone(),
            item: Some(item),
            quantity_delta,
            price_delta,
            cart_created,
        })
    }

    async fn set_item_quantity(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: i64,
        unit_price: Money,
    ) -> Result<CartMutation, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let cart_id =
            carts::lock_open_cart(user_id, &mut tx).await?.ok_or_else(|| LedgerError::NoOpenCart(user_id.clone()))?;
        let existing = cart_items::fetch_item(&cart_id, product_id, &mut tx)
            .await?
            .ok_or_else(|| LedgerError::ItemNotInCart { cart_id: cart_id.clone(), product_id: product_id.clone() })?;
        let item = cart_items::update_item(&existing.id, quantity, unit_price, &mut tx).await?;
        let quantity_delta = item.quantity - existing.quantity;
        let price_delta = item.total_price - existing.total_price;
        carts::adjust_totals(&cart_id, quantity_delta, price_delta, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Set quantity of {product_id} in cart {cart_id} to {quantity}");
        Ok(CartMutation {
            cart_id,
            product_id: product_id.clone(),
            item: Some(item),
            quantity_delta,
            price_delta,
            cart_created: false,
        })
    }

    async fn remove_item_from_open_cart(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<CartMutation, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let cart_id =
            carts::lock_open_cart(user_id, &mut tx).await?.ok_or_else(|| LedgerError::NoOpenCart(user_id.clone()))?;
        let existing = cart_items::fetch_item(&cart_id, product_id, &mut tx)
            .await?
            .ok_or_else(|| LedgerError::ItemNotInCart { cart_id: cart_id.clone(), product_id: product_id.clone() })?;
        cart_items::delete_item(&existing.id, &mut tx).await?;
        carts::adjust_totals(&cart_id, -existing.quantity, -existing.total_price, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Removed {product_id} from cart {cart_id}");
        Ok(CartMutation {
            cart_id,
            product_id: product_id.clone(),
            item: None,
            quantity_delta: -existing.quantity,
            price_delta: -existing.total_price,
            cart_created: false,
        })
    }

    async fn fetch_or_create_open_cart(
        &self,
        user_id: &UserId,
        cart_id: &CartId,
    ) -> Result<(CartWithItems, CartRetrieval), LedgerError> {
        let mut tx = self.pool.begin().await?;
        let (open_id, created) = carts::lock_or_create_open_cart(user_id, &mut tx).await?;
        if &open_id != cart_id && !created {
            debug!("🗃️ Cart {cart_id} is not the open cart for {user_id}. Returning {open_id} instead");
        }
        let cart = cart_with_items(&open_id, &mut tx)
            .await?
            .ok_or_else(|| LedgerError::CartDoesNotExist(open_id.clone()))?;
        tx.commit().await?;
        let retrieval = if created { CartRetrieval::Created } else { CartRetrieval::Retrieved };
        Ok((cart, retrieval))
    }

    async fn delete_open_cart(&self, user_id: &UserId) -> Result<CartId, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let id =
            carts::delete_open_cart(user_id, &mut conn).await?.ok_or_else(|| LedgerError::NoOpenCart(user_id.clone()))?;
        debug!("🗃️ Deleted cart {id} for {user_id}");
        Ok(id)
    }

    async fn fetch_open_cart(&self, user_id: &UserId) -> Result<Option<CartWithItems>, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let Some(cart) = carts::fetch_open_cart(user_id, &mut tx).await? else {
            return Ok(None);
        };
        let items = cart_items::fetch_items(&cart.id, &mut tx).await?;
        tx.commit().await?;
        Ok(Some(CartWithItems { cart, items }))
    }

    async fn fetch_cart(&self, cart_id: &CartId) -> Result<Option<CartWithItems>, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let cart = cart_with_items(cart_id, &mut tx).await?;
        tx.commit().await?;
        Ok(cart)
    }

    async fn reconcile_open_cart(&self, user_id: &UserId) -> Result<Reconciliation, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let cart_id =
            carts::lock_open_cart(user_id, &mut tx).await?.ok_or_else(|| LedgerError::NoOpenCart(user_id.clone()))?;
        let before = carts::fetch_cart(&cart_id, &mut tx)
            .await?
            .map(|c| CartTotals { total_quantity: c.total_quantity, overall_total_price: c.overall_total_price })
            .ok_or_else(|| LedgerError::CartDoesNotExist(cart_id.clone()))?;
        let after = carts::recompute_totals(&cart_id, &mut tx).await?;
        tx.commit().await?;
        let result = Reconciliation { before, after };
        if result.drift_corrected() {
            warn!("🗃️ Cart {cart_id} totals had drifted. Corrected {before:?} to {after:?}");
        } else {
            debug!("🗃️ Cart {cart_id} totals are consistent");
        }
        Ok(result)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order_for_cart(&self, order: NewOrder) -> Result<OrderId, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let cart_id = order.cart_id.clone();
        // Closing the cart first takes the write lock for the rest of the transaction
        let closed = carts::close_cart(&cart_id, &mut tx).await?;
        // Lines may have been removed since the caller last read the cart
        if closed && cart_items::count_items(&cart_id, &mut tx).await? == 0 {
            debug!("🗃️ Cart {cart_id} emptied before it could be ordered");
            return Err(LedgerError::EmptyCart(cart_id));
        }
        let id = match orders::idempotent_insert(order, &mut tx).await? {
            InsertOrderResult::Inserted(id) => id,
            InsertOrderResult::AlreadyExists(order_id) => {
                // Dropping the transaction rolls back the close
                return Err(LedgerError::DuplicateOrder { cart_id, order_id });
            },
        };
        tx.commit().await?;
        if !closed {
            debug!("🗃️ Cart {cart_id} is not held in this ledger, so there was nothing to close");
        }
        info!("🗃️ Order {id} created from cart {cart_id}");
        Ok(id)
    }

    async fn fetch_order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_by_id(order_id, &mut conn).await?)
    }

    async fn fetch_orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_orders_for_user(user_id, &mut conn).await?)
    }

    async fn update_order_status(&self, order_id: &OrderId, status: OrderStatusType) -> Result<Order, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        if let Some(order) = orders::update_status_guarded(order_id, status, &mut conn).await? {
            info!("🗃️ Order {order_id} is now {status}");
            return Ok(order);
        }
        match orders::fetch_order_by_id(order_id, &mut conn).await? {
            None => Err(LedgerError::OrderDoesNotExist(order_id.clone())),
            Some(order) => {
                Err(LedgerError::ForbiddenStatusChange { order_id: order_id.clone(), from: order.status, to: status })
            },
        }
    }
}
