use arcana_common::Cents;
use log::debug;
use sqlx::SqliteConnection;

use super::returned_row;
use crate::db_types::{LedgerEntry, OrderId};
use crate::helpers::ids;

pub async fn fetch_entries_for_wallet(
    wallet_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<LedgerEntry>, sqlx::Error> {
    let entries =
        sqlx::query_as("SELECT * FROM transactions WHERE wallet_id = $1 ORDER BY created_at DESC, id DESC")
            .bind(wallet_id)
            .fetch_all(conn)
            .await?;
    Ok(entries)
}

/// Credits the wallet with the reader's net amount for a settled order. The entry starts out
/// `Pending` and is released when the order completes.
pub async fn insert_sale_credit(
    wallet_id: &str,
    amount: Cents,
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<LedgerEntry, sqlx::Error> {
    let query = sqlx::query_as(
        r#"
            INSERT INTO transactions (id, wallet_id, amount, entry_type, status, order_id)
            VALUES ($1, $2, $3, 'SaleCredit', 'Pending', $4)
            RETURNING *;
        "#,
    )
    .bind(ids::object_id("txn"))
    .bind(wallet_id)
    .bind(amount)
    .bind(order_id.as_str());
    let entry: LedgerEntry = returned_row(query, conn).await?.ok_or(sqlx::Error::RowNotFound)?;
    debug!("🗃️ Credited {amount} to wallet {wallet_id} for order {order_id}");
    Ok(entry)
}

/// Inserts a pending withdrawal. `amount` must already be negative; balance checks are the
/// caller's responsibility and belong in the same transaction as this insert. The PIX key the
/// payout will go to is stored on the entry itself.
pub async fn insert_withdrawal_entry(
    wallet_id: &str,
    amount: Cents,
    pix_key: &str,
    conn: &mut SqliteConnection,
) -> Result<LedgerEntry, sqlx::Error> {
    let query = sqlx::query_as(
        r#"
            INSERT INTO transactions (id, wallet_id, amount, entry_type, status, external_id)
            VALUES ($1, $2, $3, 'Withdrawal', 'Pending', $4)
            RETURNING *;
        "#,
    )
    .bind(ids::object_id("txn"))
    .bind(wallet_id)
    .bind(amount)
    .bind(pix_key);
    let entry: LedgerEntry = returned_row(query, conn).await?.ok_or(sqlx::Error::RowNotFound)?;
    debug!("🗃️ Withdrawal of {} recorded against wallet {wallet_id}", -amount);
    Ok(entry)
}

/// Releases the pending sale credit for an order, if there is one. Returns the number of entries
/// updated (0 or 1).
pub async fn release_credit_for_order(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
            UPDATE transactions SET status = 'Completed'
            WHERE order_id = $1 AND entry_type = 'SaleCredit' AND status = 'Pending'
        "#,
    )
    .bind(order_id.as_str())
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn set_entry_status(
    entry_id: &str,
    status: crate::db_types::EntryStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<LedgerEntry>, sqlx::Error> {
    let query = sqlx::query_as("UPDATE transactions SET status = $2 WHERE id = $1 RETURNING *")
        .bind(entry_id)
        .bind(status);
    returned_row(query, conn).await
}
