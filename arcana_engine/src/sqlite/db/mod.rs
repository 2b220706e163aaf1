//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are maintained by simple functions (rather than stateful structs) that
//! accept a `&mut SqliteConnection` argument. Callers can obtain a connection from a pool, or
//! create an atomic transaction as the need arises and call through to the functions without any
//! other changes.
use std::env;

use log::info;
use sqlx::{
    query::QueryAs,
    sqlite::{SqliteArguments, SqlitePoolOptions, SqliteRow},
    Error as SqlxError,
    FromRow,
    Sqlite,
    SqliteConnection,
    SqlitePool,
};

pub mod gigs;
pub mod orders;
pub mod profiles;
pub mod sessions;
pub mod transactions;
pub mod wallets;

const SQLITE_DB_URL: &str = "sqlite://data/arcana_store.db";

pub fn db_url() -> String {
    let result = env::var("ARC_DATABASE_URL").unwrap_or_else(|_| {
        info!("ARC_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}

/// Drains a `RETURNING` statement and hands back the first returned row, if any.
///
/// The sqlite driver only commits the implicit write transaction once the statement has been read
/// to completion. Fetching a single row hands control back while that commit is still in flight,
/// and an immediate read on another pool connection then sees the pre-write database. Every write
/// with a `RETURNING` clause must therefore be read with `fetch_all` before returning.
pub(crate) async fn returned_row<'q, T>(
    query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
    conn: &mut SqliteConnection,
) -> Result<Option<T>, SqlxError>
where T: Send + Unpin + for<'r> FromRow<'r, SqliteRow>
{
    Ok(query.fetch_all(conn).await?.into_iter().next())
}
