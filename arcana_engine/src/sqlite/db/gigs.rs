use arcana_common::Cents;
use sqlx::SqliteConnection;

use super::returned_row;
use crate::db_types::{Addon, Gig};

pub async fn fetch_gig(gig_id: &str, conn: &mut SqliteConnection) -> Result<Option<Gig>, sqlx::Error> {
    let gig = sqlx::query_as("SELECT * FROM gigs WHERE id = $1").bind(gig_id).fetch_optional(conn).await?;
    Ok(gig)
}

pub async fn fetch_addons_for_gig(gig_id: &str, conn: &mut SqliteConnection) -> Result<Vec<Addon>, sqlx::Error> {
    let addons =
        sqlx::query_as("SELECT * FROM addons WHERE gig_id = $1 ORDER BY id").bind(gig_id).fetch_all(conn).await?;
    Ok(addons)
}

pub async fn insert_gig(
    id: &str,
    reader_id: &str,
    title: &str,
    price: Cents,
    conn: &mut SqliteConnection,
) -> Result<Gig, sqlx::Error> {
    let query = sqlx::query_as(
        r#"
            INSERT INTO gigs (id, reader_id, title, price)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(id)
    .bind(reader_id)
    .bind(title)
    .bind(price);
    returned_row(query, conn).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn set_gig_active(
    gig_id: &str,
    active: bool,
    conn: &mut SqliteConnection,
) -> Result<Option<Gig>, sqlx::Error> {
    let query = sqlx::query_as("UPDATE gigs SET active = $2 WHERE id = $1 RETURNING *").bind(gig_id).bind(active);
    returned_row(query, conn).await
}

pub async fn insert_addon(
    id: &str,
    gig_id: &str,
    title: &str,
    price: Cents,
    conn: &mut SqliteConnection,
) -> Result<Addon, sqlx::Error> {
    let query = sqlx::query_as(
        r#"
            INSERT INTO addons (id, gig_id, title, price)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(id)
    .bind(gig_id)
    .bind(title)
    .bind(price);
    returned_row(query, conn).await?.ok_or(sqlx::Error::RowNotFound)
}
