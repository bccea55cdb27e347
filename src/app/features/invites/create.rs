use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::post,
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use time::{Duration, OffsetDateTime};

use crate::app::{
    auth::{self, authorize::resolve_org_id, CallerIdentity},
    db,
    domain::{Email, OrganizationRole, RequiredRole},
    error::AppError,
    mail::{self, Notification},
    AppState,
};

/// Invite request body.
#[derive(Debug, Deserialize)]
pub struct CreateInviteRequest {
    pub email: String,
    /// Role the invitee receives on acceptance. Defaults to member.
    pub role: Option<OrganizationRole>,
}

/// POST /organizations/:id/invites — Invite a user into the workspace and
/// dispatch the invitation mail off the request path. Admin rank required.
async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Path(id): Path<String>,
    Json(body): Json<CreateInviteRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let org_id = resolve_org_id(&state.db, Some(&id)).await?;

    let invitee = Email::new(body.email)
        .map_err(|_| AppError::Validation("email is not valid".to_string()))?;

    let role = body.role.unwrap_or(OrganizationRole::Member);
    if role == OrganizationRole::Owner {
        return Err(AppError::Validation(
            "ownership is assigned via transfer-ownership".to_string(),
        ));
    }

    if db::members::find_by_org_and_email(&state.db, &org_id, &invitee)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(
            "user is already a member of this workspace".to_string(),
        ));
    }

    let org = db::organizations::find_by_id(&state.db, &org_id)
        .await?
        .ok_or_else(|| AppError::NotFound("organization not found".to_string()))?;

    let inviter = Email::new(identity.email.clone()).map_err(|_| AppError::UserNotFound)?;

    let invite = db::organization_invites::NewOrganizationInvite {
        id: ulid::Ulid::new().to_string(),
        organization_id: org_id.clone(),
        email: invitee.clone(),
        role,
        invited_by_email: inviter.clone(),
        token: ulid::Ulid::new().to_string(),
        expires_at: (OffsetDateTime::now_utc() + Duration::days(7)).unix_timestamp(),
    };
    db::organization_invites::insert(&state.db, &invite).await?;

    let message = Notification::WorkspaceInvite {
        org_name: org.name,
        invited_by: inviter.as_str().to_string(),
        token: invite.token.clone(),
    }
    .into_message(invitee, &state.config);
    mail::dispatch(state.mail.clone(), message);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "invite sent",
            "data": { "invite_id": invite.id }
        })),
    ))
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/organizations/:id/invites", post(create))
        .route_layer(from_fn_with_state(
            (state.clone(), RequiredRole::Org(OrganizationRole::Admin)),
            auth::middleware::authorize,
        ))
        .route_layer(from_fn_with_state(state, auth::middleware::authenticate))
}
