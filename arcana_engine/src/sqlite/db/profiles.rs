use sqlx::SqliteConnection;

use super::returned_row;
use crate::db_types::{Profile, Role};

pub async fn fetch_profile(profile_id: &str, conn: &mut SqliteConnection) -> Result<Option<Profile>, sqlx::Error> {
    let profile =
        sqlx::query_as("SELECT * FROM profiles WHERE id = $1").bind(profile_id).fetch_optional(conn).await?;
    Ok(profile)
}

/// Inserts a profile with the default order caps. Mostly useful for seeding and tests; profile
/// registration proper lives outside this service.
pub async fn insert_profile(
    id: &str,
    role: Role,
    display_name: &str,
    email: &str,
    conn: &mut SqliteConnection,
) -> Result<Profile, sqlx::Error> {
    let query = sqlx::query_as(
        r#"
            INSERT INTO profiles (id, role, display_name, email)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(id)
    .bind(role)
    .bind(display_name)
    .bind(email);
    returned_row(query, conn).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn update_billing_details(
    profile_id: &str,
    tax_id: Option<&str>,
    cellphone: Option<&str>,
    pix_key: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Option<Profile>, sqlx::Error> {
    let query = sqlx::query_as(
        r#"
            UPDATE profiles SET
                tax_id = COALESCE($2, tax_id),
                cellphone = COALESCE($3, cellphone),
                pix_key = COALESCE($4, pix_key)
            WHERE id = $1
            RETURNING *;
        "#,
    )
    .bind(profile_id)
    .bind(tax_id)
    .bind(cellphone)
    .bind(pix_key);
    returned_row(query, conn).await
}

pub async fn set_order_caps(
    profile_id: &str,
    max_orders_per_day: i64,
    max_simultaneous_orders: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Profile>, sqlx::Error> {
    let query = sqlx::query_as(
        "UPDATE profiles SET max_orders_per_day = $2, max_simultaneous_orders = $3 WHERE id = $1 RETURNING *",
    )
    .bind(profile_id)
    .bind(max_orders_per_day)
    .bind(max_simultaneous_orders);
    returned_row(query, conn).await
}
