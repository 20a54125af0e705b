use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{CartId, CartItem, CartItemId, Money, ProductId},
};

const ITEM_COLUMNS: &str = "_id, cart_id, product_id, quantity, unit_price, total_price, created_at, updated_at";

pub async fn fetch_item(
    cart_id: &CartId,
    product_id: &ProductId,
    conn: &mut SqliteConnection,
) -> Result<Option<CartItem>, SqliteDatabaseError> {
    let item = sqlx::query_as::<_, CartItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM cart_items WHERE cart_id = $1 AND product_id = $2"
    ))
    .bind(cart_id)
    .bind(product_id)
    .fetch_optional(conn)
    .await?;
    Ok(item)
}

/// All lines in the cart, in the order they were first added.
pub async fn fetch_items(cart_id: &CartId, conn: &mut SqliteConnection) -> Result<Vec<CartItem>, SqliteDatabaseError> {
    let items =
        sqlx::query_as::<_, CartItem>(&format!("SELECT {ITEM_COLUMNS} FROM cart_items WHERE cart_id = $1 ORDER BY rowid"))
            .bind(cart_id)
            .fetch_all(conn)
            .await?;
    Ok(items)
}

fn line_total(quantity: i64, unit_price: Money) -> Result<Money, SqliteDatabaseError> {
    unit_price.checked_mul(quantity).ok_or(SqliteDatabaseError::LineTotalOverflow { quantity, unit_price })
}

/// The number of lines in the cart.
pub async fn count_items(cart_id: &CartId, conn: &mut SqliteConnection) -> Result<i64, SqliteDatabaseError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cart_items WHERE cart_id = $1")
        .bind(cart_id)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

pub async fn insert_item(
    cart_id: &CartId,
    product_id: &ProductId,
    quantity: i64,
    unit_price: Money,
    conn: &mut SqliteConnection,
) -> Result<CartItem, SqliteDatabaseError> {
    let total_price = line_total(quantity, unit_price)?;
    let item = sqlx::query_as::<_, CartItem>(&format!(
        r#"
            INSERT INTO cart_items (_id, cart_id, product_id, quantity, unit_price, total_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(CartItemId::random())
    .bind(cart_id)
    .bind(product_id)
    .bind(quantity)
    .bind(unit_price)
    .bind(total_price)
    .fetch_one(conn)
    .await?;
    trace!("🗃️ Inserted line {} for {product_id} into cart {cart_id}", item.id);
    Ok(item)
}

/// Rewrites a line's quantity and unit price. The line total is recomputed from the two.
pub async fn update_item(
    item_id: &CartItemId,
    quantity: i64,
    unit_price: Money,
    conn: &mut SqliteConnection,
) -> Result<CartItem, SqliteDatabaseError> {
    let total_price = line_total(quantity, unit_price)?;
    let item = sqlx::query_as::<_, CartItem>(&format!(
        r#"
            UPDATE cart_items SET
                quantity = $1,
                unit_price = $2,
                total_price = $3,
                updated_at = CURRENT_TIMESTAMP
            WHERE _id = $4
            RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(quantity)
    .bind(unit_price)
    .bind(total_price)
    .bind(item_id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| SqliteDatabaseError::QueryError(format!("Cart line {item_id} does not exist")))?;
    trace!("🗃️ Cart line {item_id} now holds {quantity} at {unit_price}");
    Ok(item)
}

pub async fn delete_item(item_id: &CartItemId, conn: &mut SqliteConnection) -> Result<(), SqliteDatabaseError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE _id = $1").bind(item_id).execute(conn).await?;
    if result.rows_affected() != 1 {
        return Err(SqliteDatabaseError::QueryError(format!("Cart line {item_id} does not exist")));
    }
    Ok(())
}
