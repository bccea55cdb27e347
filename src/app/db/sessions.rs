use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

/// Database row for sessions table. `data` is a JSON object holding the
/// session's key/value pairs (user_id, email).
#[derive(Debug, FromRow)]
pub struct Session {
    pub id: String,
    pub data: String,
    pub created_at: i64,
    pub expires_at: i64,
}

/// Insert a session row. The ID is chosen by the session store.
pub async fn insert<'e, E>(
    executor: E,
    session_id: &str,
    data: &str,
    expires_at: OffsetDateTime,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query("INSERT INTO sessions (id, data, created_at, expires_at) VALUES (?, ?, ?, ?)")
        .bind(session_id)
        .bind(data)
        .bind(now)
        .bind(expires_at.unix_timestamp())
        .execute(executor)
        .await?;
    Ok(())
}

/// Find a valid (non-expired) session by ID.
pub async fn find_valid<'e, E>(
    executor: E,
    session_id: &str,
) -> Result<Option<Session>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query_as::<_, Session>(
        "SELECT id, data, created_at, expires_at FROM sessions WHERE id = ? AND expires_at > ?",
    )
    .bind(session_id)
    .bind(now)
    .fetch_optional(executor)
    .await
}

/// Overwrite a session's data and push its expiry forward.
pub async fn update_data<'e, E>(
    executor: E,
    session_id: &str,
    data: &str,
    expires_at: OffsetDateTime,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("UPDATE sessions SET data = ?, expires_at = ? WHERE id = ?")
        .bind(data)
        .bind(expires_at.unix_timestamp())
        .bind(session_id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Delete a session (logout).
pub async fn delete<'e, E>(executor: E, session_id: &str) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(session_id)
        .execute(executor)
        .await?;
    Ok(())
}
