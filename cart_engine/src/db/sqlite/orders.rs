use log::{debug, trace};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db::{sqlite::SqliteDatabaseError, traits::InsertOrderResult},
    db_types::{CartId, NewOrder, Order, OrderId, OrderStatusType, UserId},
};

const ORDER_COLUMNS: &str = "_id, cart_id, user_id, status, created_at, updated_at";

/// Inserts the order unless one already exists for the same cart, in which case the existing order id is returned.
///
/// This is not atomic on its own. Embed it in a transaction that already holds the write lock.
pub async fn idempotent_insert(
    order: NewOrder,
    conn: &mut SqliteConnection,
) -> Result<InsertOrderResult, SqliteDatabaseError> {
    if let Some(id) = order_for_cart(&order.cart_id, conn).await? {
        return Ok(InsertOrderResult::AlreadyExists(id));
    }
    let cart_id = order.cart_id.clone();
    match insert_order(order, conn).await {
        Ok(id) => Ok(InsertOrderResult::Inserted(id)),
        Err(SqliteDatabaseError::DriverError(e)) if is_unique_violation(&e) => {
            debug!("🗃️ Lost the race to create an order for cart {cart_id}");
            let id = order_for_cart(&cart_id, conn)
                .await?
                .ok_or_else(|| SqliteDatabaseError::QueryError(format!("Order for cart {cart_id} vanished")))?;
            Ok(InsertOrderResult::AlreadyExists(id))
        },
        Err(e) => Err(e),
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error().map(|d| d.is_unique_violation()).unwrap_or(false)
}

async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<OrderId, SqliteDatabaseError> {
    let id = sqlx::query_scalar::<_, OrderId>(
        r#"
            INSERT INTO orders (_id, cart_id, user_id, status) VALUES ($1, $2, $3, $4)
            RETURNING _id
        "#,
    )
    .bind(&order.id)
    .bind(&order.cart_id)
    .bind(&order.user_id)
    .bind(order.status.to_string())
    .fetch_one(conn)
    .await?;
    trace!("🗃️ Inserted order {id} for cart {}", order.cart_id);
    Ok(id)
}

/// Returns the id of the order created from `cart_id`, if there is one.
pub async fn order_for_cart(cart_id: &CartId, conn: &mut SqliteConnection) -> Result<Option<OrderId>, SqliteDatabaseError> {
    let id = sqlx::query_scalar::<_, OrderId>("SELECT _id FROM orders WHERE cart_id = $1")
        .bind(cart_id)
        .fetch_optional(conn)
        .await?;
    Ok(id)
}

pub async fn fetch_order_by_id(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, SqliteDatabaseError> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE _id = $1"))
        .bind(order_id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// All orders placed by the user, newest first.
pub async fn fetch_orders_for_user(user_id: &UserId, conn: &mut SqliteConnection) -> Result<Vec<Order>, SqliteDatabaseError> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, rowid DESC"
    ))
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(orders)
}

/// Moves the order to `status` only if its current status is one of the allowed predecessors.
///
/// Returns `None` if no row matched, either because the order does not exist or because the transition is not
/// allowed. The check and the write happen in a single statement.
pub async fn update_status_guarded(
    order_id: &OrderId,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, SqliteDatabaseError> {
    let predecessors = status.allowed_predecessors();
    if predecessors.is_empty() {
        return Ok(None);
    }
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE orders SET status = ");
    builder.push_bind(status.to_string());
    builder.push(", updated_at = CURRENT_TIMESTAMP WHERE _id = ");
    builder.push_bind(order_id.as_str());
    builder.push(" AND status IN (");
    let mut separated = builder.separated(", ");
    for s in predecessors {
        separated.push_bind(s.to_string());
    }
    separated.push_unseparated(") RETURNING ");
    builder.push(ORDER_COLUMNS);
    trace!("🗃️ Executing query: {}", builder.sql());
    let order = builder.build_query_as::<Order>().fetch_optional(conn).await?;
    Ok(order)
}
