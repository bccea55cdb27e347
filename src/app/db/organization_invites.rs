use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{Email, OrganizationId, OrganizationRole};

/// Database row for organization_invites table.
#[derive(Debug, FromRow)]
pub struct OrganizationInvite {
    pub id: String,
    pub organization_id: String,
    pub email: String,
    pub role: String,
    pub invited_by_email: String,
    pub token: String,
    pub expires_at: i64,
    pub created_at: i64,
}

/// Data structure for inserting a new organization invite.
pub struct NewOrganizationInvite {
    pub id: String,
    pub organization_id: OrganizationId,
    pub email: Email,
    pub role: OrganizationRole,
    pub invited_by_email: Email,
    pub token: String,
    pub expires_at: i64,
}

/// Insert a new organization invite.
pub async fn insert<'e, E>(
    executor: E,
    invite: &NewOrganizationInvite,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO organization_invites (id, organization_id, email, role, invited_by_email, token, expires_at, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&invite.id)
    .bind(invite.organization_id.as_str())
    .bind(invite.email.as_str())
    .bind(invite.role.to_string())
    .bind(invite.invited_by_email.as_str())
    .bind(&invite.token)
    .bind(invite.expires_at)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Find an invite by token. Only returns invites that have not expired.
pub async fn find_by_token<'e, E>(
    executor: E,
    token: &str,
) -> Result<Option<OrganizationInvite>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query_as::<_, OrganizationInvite>(
        "SELECT id, organization_id, email, role, invited_by_email, token, expires_at, created_at FROM organization_invites WHERE token = ? AND expires_at > ?",
    )
    .bind(token)
    .bind(now)
    .fetch_optional(executor)
    .await
}

/// Delete an invite after it has been accepted. Consuming the row is how an
/// invite is marked used.
pub async fn delete_by_id<'e, E>(executor: E, id: &str) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("DELETE FROM organization_invites WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}
