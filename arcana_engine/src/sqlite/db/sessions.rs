use sqlx::SqliteConnection;

use crate::db_types::Profile;

/// Resolves a session token to its owning profile in a single indexed read.
pub async fn profile_for_session(token: &str, conn: &mut SqliteConnection) -> Result<Option<Profile>, sqlx::Error> {
    let profile = sqlx::query_as(
        r#"
            SELECT p.* FROM profiles p
            INNER JOIN sessions s ON s.profile_id = p.id
            WHERE s.token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(conn)
    .await?;
    Ok(profile)
}

pub async fn insert_session(token: &str, profile_id: &str, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO sessions (token, profile_id) VALUES ($1, $2)")
        .bind(token)
        .bind(profile_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn delete_session(token: &str, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE token = $1").bind(token).execute(conn).await?;
    Ok(result.rows_affected())
}
