use log::debug;
use sqlx::types::Json;
use sqlx::SqliteConnection;

use super::returned_row;
use crate::db_types::{DeliveryContent, NewOrder, Order, OrderId};

/// Inserts a new order. This is not atomic on its own. You can embed this call inside a
/// transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let query = sqlx::query_as(
        r#"
            INSERT INTO orders (
                id,
                client_id,
                reader_id,
                gig_id,
                amount_total,
                amount_platform_fee,
                amount_reader_net,
                selected_addons,
                requirements_answers
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *;
        "#,
    )
    .bind(order.id)
    .bind(order.client_id)
    .bind(order.reader_id)
    .bind(order.gig_id)
    .bind(order.amount_total)
    .bind(order.amount_platform_fee)
    .bind(order.amount_reader_net)
    .bind(Json(order.selected_addons))
    .bind(Json(order.requirements_answers));
    let order: Order = returned_row(query, conn).await?.ok_or(sqlx::Error::RowNotFound)?;
    debug!("📝️ Order [{}] created for {} at {}", order.id, order.client_id, order.amount_total);
    Ok(order)
}

pub async fn fetch_order(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_order_by_payment_id(
    payment_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE external_payment_id = $1")
        .bind(payment_id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// All orders the given profile participates in, as client or as reader, newest first.
pub async fn fetch_orders_for_profile(
    profile_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as(
        "SELECT * FROM orders WHERE client_id = $1 OR reader_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(profile_id)
    .fetch_all(conn)
    .await?;
    Ok(orders)
}

pub async fn attach_payment_id(
    order_id: &OrderId,
    payment_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let query = sqlx::query_as(
        r#"
            UPDATE orders
            SET external_payment_id = $2, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING *;
        "#,
    )
    .bind(order_id.as_str())
    .bind(payment_id);
    returned_row(query, conn).await
}

/// Non-cancelled orders the reader received on the current UTC calendar day.
pub async fn count_orders_today(reader_id: &str, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let count = sqlx::query_scalar(
        r#"
            SELECT COUNT(*) FROM orders
            WHERE reader_id = $1 AND status != 'Cancelled' AND date(created_at) = date('now')
        "#,
    )
    .bind(reader_id)
    .fetch_one(conn)
    .await?;
    Ok(count)
}

pub async fn count_orders_in_progress(reader_id: &str, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let count =
        sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE reader_id = $1 AND status IN ('Paid', 'Delivered')")
            .bind(reader_id)
            .fetch_one(conn)
            .await?;
    Ok(count)
}

/// Conditionally moves the order from `PendingPayment` to `Paid`.
///
/// The status guard lives in the WHERE clause so that check and write are a single statement:
/// of two concurrent settlement attempts, exactly one gets the row back and the other gets
/// `None`. Callers must issue this as the first statement of their transaction so the write lock
/// is taken before anything has been read.
pub async fn mark_paid(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let query = sqlx::query_as(
        r#"
            UPDATE orders
            SET status = 'Paid', updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND status = 'PendingPayment'
            RETURNING *;
        "#,
    )
    .bind(order_id.as_str());
    returned_row(query, conn).await
}

/// Conditionally moves a `Paid` order to `Delivered`, recording the delivery content. Guards on
/// the reader id as well, so a stranger's call leaves the row untouched.
pub async fn mark_delivered(
    order_id: &OrderId,
    reader_id: &str,
    content: DeliveryContent,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let query = sqlx::query_as(
        r#"
            UPDATE orders
            SET status = 'Delivered', delivery_content = $3, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND reader_id = $2 AND status = 'Paid'
            RETURNING *;
        "#,
    )
    .bind(order_id.as_str())
    .bind(reader_id)
    .bind(Json(content));
    returned_row(query, conn).await
}

/// Conditionally moves a `Delivered` order to `Completed`. Only the client may complete.
pub async fn mark_completed(
    order_id: &OrderId,
    client_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let query = sqlx::query_as(
        r#"
            UPDATE orders
            SET status = 'Completed', updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND client_id = $2 AND status = 'Delivered'
            RETURNING *;
        "#,
    )
    .bind(order_id.as_str())
    .bind(client_id);
    returned_row(query, conn).await
}

/// Conditionally cancels a `PendingPayment` order. Either party to the order may cancel.
pub async fn mark_cancelled(
    order_id: &OrderId,
    caller_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let query = sqlx::query_as(
        r#"
            UPDATE orders
            SET status = 'Cancelled', updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND (client_id = $2 OR reader_id = $2) AND status = 'PendingPayment'
            RETURNING *;
        "#,
    )
    .bind(order_id.as_str())
    .bind(caller_id);
    returned_row(query, conn).await
}
