use log::debug;
use sqlx::SqliteConnection;

use super::returned_row;
use crate::db_types::Wallet;
use crate::helpers::ids;

pub async fn fetch_wallet_for_user(user_id: &str, conn: &mut SqliteConnection) -> Result<Option<Wallet>, sqlx::Error> {
    let wallet =
        sqlx::query_as("SELECT * FROM wallets WHERE user_id = $1").bind(user_id).fetch_optional(conn).await?;
    Ok(wallet)
}

/// Fetches the user's wallet, creating it on first use. The `user_id` column is UNIQUE, so even a
/// racing insert cannot produce a second wallet for the same user.
pub async fn fetch_or_create_wallet(user_id: &str, conn: &mut SqliteConnection) -> Result<Wallet, sqlx::Error> {
    if let Some(wallet) = fetch_wallet_for_user(user_id, &mut *conn).await? {
        return Ok(wallet);
    }
    let query = sqlx::query_as(
        r#"
            INSERT INTO wallets (id, user_id) VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET user_id = user_id
            RETURNING *;
        "#,
    )
    .bind(ids::object_id("wal"))
    .bind(user_id);
    let wallet: Wallet = returned_row(query, conn).await?.ok_or(sqlx::Error::RowNotFound)?;
    debug!("🗃️ Created wallet {} for user {user_id}", wallet.id);
    Ok(wallet)
}
