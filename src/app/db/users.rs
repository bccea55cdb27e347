use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{Email, GlobalRole, HashedPassword, UserId};

/// Database row for users table.
#[derive(Debug, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub global_role: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Data structure for inserting a new user.
pub struct NewUser {
    pub id: UserId,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub global_role: GlobalRole,
}

/// Find a user by email address. Callers pass a normalized `Email`, so the
/// lookup is case-insensitive by construction.
pub async fn find_by_email<'e, E>(
    executor: E,
    email: &Email,
) -> Result<Option<User>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, global_role, created_at, updated_at FROM users WHERE email = ?",
    )
    .bind(email.as_str())
    .fetch_optional(executor)
    .await
}

/// Insert a new user into the database.
pub async fn insert<'e, E>(executor: E, user: &NewUser) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();

    sqlx::query(
        "INSERT INTO users (id, email, password_hash, global_role, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(user.id.as_str())
    .bind(user.email.as_str())
    .bind(user.password_hash.as_str())
    .bind(user.global_role.to_string())
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(())
}

/// Change a user's platform-wide role.
pub async fn set_global_role<'e, E>(
    executor: E,
    user_id: &UserId,
    role: GlobalRole,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query("UPDATE users SET global_role = ?, updated_at = ? WHERE id = ?")
        .bind(role.to_string())
        .bind(now)
        .bind(user_id.as_str())
        .execute(executor)
        .await?;
    Ok(())
}
