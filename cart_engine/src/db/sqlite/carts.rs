use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{Cart, CartId, CartTotals, Money, UserId},
};

/// Takes the write lock on the user's open cart by touching its `updated_at` column, returning the cart id.
///
/// This must be the first statement of every cart transaction. SQLite only upgrades a transaction to a writer when it
/// first writes, and a reader that tries to upgrade after another writer has committed fails with `SQLITE_BUSY`
/// instead of waiting. Writing first means concurrent mutations queue on the busy timeout instead.
pub async fn lock_open_cart(user_id: &UserId, conn: &mut SqliteConnection) -> Result<Option<CartId>, SqliteDatabaseError> {
    let id = sqlx::query_scalar::<_, CartId>(
        "UPDATE carts SET updated_at = CURRENT_TIMESTAMP WHERE user_id = $1 AND closed = FALSE RETURNING _id",
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    trace!("🗃️ Locked open cart for {user_id}: {id:?}");
    Ok(id)
}

/// Inserts a new, empty open cart for the user. Returns `None` if the user already has an open cart.
async fn insert_open_cart(user_id: &UserId, conn: &mut SqliteConnection) -> Result<Option<CartId>, SqliteDatabaseError> {
    let id = sqlx::query_scalar::<_, CartId>(
        r#"
            INSERT INTO carts (_id, user_id) VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            RETURNING _id
        "#,
    )
    .bind(CartId::random())
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(id)
}

/// Locks the user's open cart, creating it first if necessary. The flag is true if the cart was created.
pub async fn lock_or_create_open_cart(
    user_id: &UserId,
    conn: &mut SqliteConnection,
) -> Result<(CartId, bool), SqliteDatabaseError> {
    if let Some(id) = lock_open_cart(user_id, conn).await? {
        return Ok((id, false));
    }
    if let Some(id) = insert_open_cart(user_id, conn).await? {
        debug!("🗃️ Created new cart {id} for {user_id}");
        return Ok((id, true));
    }
    // Another connection created the cart between our two statements
    let id = lock_open_cart(user_id, conn)
        .await?
        .ok_or_else(|| SqliteDatabaseError::QueryError(format!("Could not create an open cart for {user_id}")))?;
    Ok((id, false))
}

/// Moves the cart totals by the given deltas. This is a relative update, so it never overwrites a concurrent change.
pub async fn adjust_totals(
    cart_id: &CartId,
    quantity_delta: i64,
    price_delta: Money,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    let result = sqlx::query(
        r#"
            UPDATE carts SET
                total_quantity = total_quantity + $1,
                overall_total_price = overall_total_price + $2,
                updated_at = CURRENT_TIMESTAMP
            WHERE _id = $3
        "#,
    )
    .bind(quantity_delta)
    .bind(price_delta)
    .bind(cart_id)
    .execute(conn)
    .await?;
    if result.rows_affected() != 1 {
        return Err(SqliteDatabaseError::QueryError(format!("Could not adjust totals for cart {cart_id}")));
    }
    trace!("🗃️ Cart {cart_id} totals moved by {quantity_delta} items and {price_delta}");
    Ok(())
}

pub async fn fetch_cart(cart_id: &CartId, conn: &mut SqliteConnection) -> Result<Option<Cart>, SqliteDatabaseError> {
    let cart = sqlx::query_as::<_, Cart>(
        r#"
            SELECT _id, user_id, total_quantity, overall_total_price, closed, created_at, updated_at
            FROM carts
            WHERE _id = $1
        "#,
    )
    .bind(cart_id)
    .fetch_optional(conn)
    .await?;
    Ok(cart)
}

pub async fn fetch_open_cart(user_id: &UserId, conn: &mut SqliteConnection) -> Result<Option<Cart>, SqliteDatabaseError> {
    let cart = sqlx::query_as::<_, Cart>(
        r#"
            SELECT _id, user_id, total_quantity, overall_total_price, closed, created_at, updated_at
            FROM carts
            WHERE user_id = $1 AND closed = FALSE
        "#,
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(cart)
}

/// Marks the cart as closed. Returns false if the cart does not exist or was already closed.
pub async fn close_cart(cart_id: &CartId, conn: &mut SqliteConnection) -> Result<bool, SqliteDatabaseError> {
    let result =
        sqlx::query("UPDATE carts SET closed = TRUE, updated_at = CURRENT_TIMESTAMP WHERE _id = $1 AND closed = FALSE")
            .bind(cart_id)
            .execute(conn)
            .await?;
    Ok(result.rows_affected() == 1)
}

/// Deletes the user's open cart. Line items go with it via the cascading foreign key.
pub async fn delete_open_cart(user_id: &UserId, conn: &mut SqliteConnection) -> Result<Option<CartId>, SqliteDatabaseError> {
    let id = sqlx::query_scalar::<_, CartId>("DELETE FROM carts WHERE user_id = $1 AND closed = FALSE RETURNING _id")
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(id)
}

/// Overwrites the cart totals with the sums of its line items and returns the new totals.
pub async fn recompute_totals(cart_id: &CartId, conn: &mut SqliteConnection) -> Result<CartTotals, SqliteDatabaseError> {
    let totals = sqlx::query_as::<_, CartTotals>(
        r#"
            UPDATE carts SET
                total_quantity = (SELECT COALESCE(SUM(quantity), 0) FROM cart_items WHERE cart_id = $1),
                overall_total_price = (SELECT COALESCE(SUM(total_price), 0) FROM cart_items WHERE cart_id = $1),
                updated_at = CURRENT_TIMESTAMP
            WHERE _id = $1
            RETURNING total_quantity, overall_total_price
        "#,
    )
    .bind(cart_id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| SqliteDatabaseError::QueryError(format!("Cart {cart_id} does not exist")))?;
    Ok(totals)
}
