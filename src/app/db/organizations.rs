use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{Email, OrganizationId};

/// Database row for organizations table. Billing columns hold JSON blobs
/// managed by the billing handlers.
#[derive(Debug, FromRow)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub creator_email: String,
    pub billing_setting: Option<String>,
    pub billing_contact: Option<String>,
    pub created_at: i64,
}

/// Data structure for inserting a new organization.
pub struct NewOrganization {
    pub id: OrganizationId,
    pub name: String,
    pub slug: String,
    pub creator_email: Email,
}

/// Insert a new organization.
pub async fn insert<'e, E>(executor: E, org: &NewOrganization) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO organizations (id, name, slug, creator_email, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(org.id.as_str())
    .bind(&org.name)
    .bind(&org.slug)
    .bind(org.creator_email.as_str())
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Find an organization by primary key.
pub async fn find_by_id<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
) -> Result<Option<Organization>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = ?")
        .bind(organization_id.as_str())
        .fetch_optional(executor)
        .await
}

/// Find an organization by workspace slug.
pub async fn find_by_slug<'e, E>(
    executor: E,
    slug: &str,
) -> Result<Option<Organization>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE slug = ?")
        .bind(slug)
        .fetch_optional(executor)
        .await
}

/// List all organizations, newest first.
pub async fn list<'e, E>(executor: E) -> Result<Vec<Organization>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Organization>("SELECT * FROM organizations ORDER BY created_at DESC")
        .fetch_all(executor)
        .await
}

/// Delete an organization. Membership cleanup is the caller's job so both
/// deletes run in one transaction.
pub async fn delete<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM organizations WHERE id = ?")
        .bind(organization_id.as_str())
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Update one of the billing JSON columns. `column` is constrained to the
/// two known names at the call sites.
pub async fn update_billing<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
    column: BillingColumn,
    value: &str,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let sql = match column {
        BillingColumn::Setting => "UPDATE organizations SET billing_setting = ? WHERE id = ?",
        BillingColumn::Contact => "UPDATE organizations SET billing_contact = ? WHERE id = ?",
    };
    let result = sqlx::query(sql)
        .bind(value)
        .bind(organization_id.as_str())
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Which billing column an update targets.
#[derive(Debug, Clone, Copy)]
pub enum BillingColumn {
    Setting,
    Contact,
}
