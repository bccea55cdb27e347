//! Role hierarchy evaluation.
//!
//! **Rule**: the session or token only proves identity, never privileges.
//! Privilege data is re-read from the store on every request — there is no
//! role cache, so a mid-flight role change is observed by the next request.

use sqlx::SqlitePool;

use crate::app::auth::identity::CallerIdentity;
use crate::app::db;
use crate::app::domain::{Email, GlobalRole, OrganizationId, OrganizationRef, RequiredRole};
use crate::app::error::AppError;

/// Decide whether `identity` may act at the `required` privilege level,
/// scoped to the organization named by `org_param` when the requirement is
/// organization-scoped.
///
/// The global-admin check and the membership check are independent scopes:
/// a global admin with no membership in the target organization is still
/// denied an organization-scoped check there.
///
/// Returns the membership-scoped identity to place in the request context.
pub async fn evaluate(
    pool: &SqlitePool,
    identity: &CallerIdentity,
    org_param: Option<&str>,
    required: RequiredRole,
) -> Result<CallerIdentity, AppError> {
    let email = Email::new(identity.email.clone()).map_err(|_| AppError::UserNotFound)?;

    let user = db::users::find_by_email(pool, &email)
        .await?
        .ok_or(AppError::UserNotFound)?;

    match required {
        RequiredRole::GlobalAdmin => {
            let role: GlobalRole = user.global_role.parse().map_err(|_| AppError::Internal)?;
            if role != GlobalRole::Admin {
                return Err(AppError::AccessDenied);
            }
        }
        RequiredRole::Org(required_role) => {
            let org_id = resolve_org_id(pool, org_param).await?;

            let member = db::members::find_by_org_and_email(pool, &org_id, &email)
                .await?
                .ok_or(AppError::AccessDenied)?;

            let member_role = member.parsed_role().ok_or(AppError::Internal)?;

            // Strict >: equal rank passes.
            if required_role > member_role {
                return Err(AppError::AccessDenied);
            }
        }
    }

    Ok(CallerIdentity {
        id: identity.id.clone(),
        email: email.as_str().to_string(),
    })
}

/// Resolve a route's organization identifier to the primary key. The raw
/// value is either a structured key (ULID) or a workspace slug; a hyphen is
/// the structural marker for the slug form. A value that is neither is a
/// malformed identifier (400), distinct from "no membership" (401).
pub async fn resolve_org_id(
    pool: &SqlitePool,
    org_param: Option<&str>,
) -> Result<OrganizationId, AppError> {
    let raw = org_param
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::BadRequest("missing organization id".to_string()))?;

    match OrganizationRef::parse(raw) {
        Some(OrganizationRef::Id(id)) => Ok(id),
        Some(OrganizationRef::Slug(slug)) => {
            let org = db::organizations::find_by_slug(pool, &slug)
                .await?
                // Unknown slug means no membership can exist there; deny
                // rather than reveal which workspaces exist.
                .ok_or(AppError::AccessDenied)?;
            OrganizationId::from_string(&org.id).map_err(|_| AppError::Internal)
        }
        None => Err(AppError::BadRequest("invalid organization id".to_string())),
    }
}
