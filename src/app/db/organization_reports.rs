use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{Email, OrganizationId};

/// Database row for organization_reports table.
#[derive(Debug, FromRow)]
pub struct OrganizationReport {
    pub id: String,
    pub organization_id: String,
    pub reporter_email: String,
    pub offender_email: String,
    pub subject: String,
    pub body: String,
    pub created_at: i64,
}

/// Data structure for inserting a new report.
pub struct NewOrganizationReport {
    pub id: String,
    pub organization_id: OrganizationId,
    pub reporter_email: Email,
    pub offender_email: Email,
    pub subject: String,
    pub body: String,
}

/// Insert a new report.
pub async fn insert<'e, E>(
    executor: E,
    report: &NewOrganizationReport,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO organization_reports (id, organization_id, reporter_email, offender_email, subject, body, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&report.id)
    .bind(report.organization_id.as_str())
    .bind(report.reporter_email.as_str())
    .bind(report.offender_email.as_str())
    .bind(&report.subject)
    .bind(&report.body)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Find a report by its row ID, scoped to the organization.
pub async fn find_by_org_and_id<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
    report_id: &str,
) -> Result<Option<OrganizationReport>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, OrganizationReport>(
        "SELECT id, organization_id, reporter_email, offender_email, subject, body, created_at FROM organization_reports WHERE organization_id = ? AND id = ?",
    )
    .bind(organization_id.as_str())
    .bind(report_id)
    .fetch_optional(executor)
    .await
}

/// List all reports filed in an organization, newest first.
pub async fn list_for_org<'e, E>(
    executor: E,
    organization_id: &OrganizationId,
) -> Result<Vec<OrganizationReport>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, OrganizationReport>(
        "SELECT id, organization_id, reporter_email, offender_email, subject, body, created_at FROM organization_reports WHERE organization_id = ? ORDER BY created_at DESC",
    )
    .bind(organization_id.as_str())
    .fetch_all(executor)
    .await
}
