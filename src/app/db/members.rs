use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{Email, OrganizationId, OrganizationRole};

/// Database row for members table. One row per (organization, email) pair;
/// the UNIQUE constraint enforces that invariant.
#[derive(Debug, FromRow)]
pub struct Member {
    pub id: String,
    pub organization_id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub created_at: i64,
}

impl Member {
    /// Parse the stored role string. The column only ever holds values
    /// written through `OrganizationRole::to_string`, so a parse failure
    /// means a corrupt row.
    pub fn parsed_role(&self) -> Option<OrganizationRole> {
        self.role.parse().ok()
    }
}

/// Data structure for inserting a new member.
pub struct NewMember {
    pub id: String,
    pub organization_id: OrganizationId,
    pub email: Email,
    pub display_name: String,
    pub role: OrganizationRole,
}

/// Insert a new member.
pub async fn insert<'e, E>(executor: E, member: &NewMember) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO members (id, organization_id, email, display_name, role, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&member.id)
    .bind(member.organization_id.as_str())
    .bind(member.email.as_str())
    .bind(&member.display_name)
    .bind(member.role.to_string())
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Find the membership record for (organization, email). This is the query
/// every organization-scoped authorization decision runs, fresh per request.
pub async fn find_by_org_and_email<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
    email: &Email,
) -> Result<Option<Member>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Member>(
        "SELECT id, organization_id, email, display_name, role, created_at FROM members WHERE organization_id = ? AND email = ?",
    )
    .bind(organization_id.as_str())
    .bind(email.as_str())
    .fetch_optional(executor)
    .await
}

/// Find a member by its row ID, scoped to the organization.
pub async fn find_by_org_and_id<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
    member_id: &str,
) -> Result<Option<Member>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Member>(
        "SELECT id, organization_id, email, display_name, role, created_at FROM members WHERE organization_id = ? AND id = ?",
    )
    .bind(organization_id.as_str())
    .bind(member_id)
    .fetch_optional(executor)
    .await
}

/// List all members of an organization.
pub async fn list_for_org<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
) -> Result<Vec<Member>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Member>(
        "SELECT id, organization_id, email, display_name, role, created_at FROM members WHERE organization_id = ? ORDER BY created_at",
    )
    .bind(organization_id.as_str())
    .fetch_all(executor)
    .await
}

/// Change a member's role, scoped to the organization so a member ID from
/// another workspace cannot be targeted. Returns the number of rows touched
/// so callers can distinguish "no such member" from success.
pub async fn update_role<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
    member_id: &str,
    role: OrganizationRole,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("UPDATE members SET role = ? WHERE id = ? AND organization_id = ?")
        .bind(role.to_string())
        .bind(member_id)
        .bind(organization_id.as_str())
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Remove every membership record of an organization (org deletion).
pub async fn delete_for_org<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM members WHERE organization_id = ?")
        .bind(organization_id.as_str())
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
