use axum::{
    extract::State, middleware::from_fn_with_state, routing::post, Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::app::{
    auth::{self, CallerIdentity},
    db,
    domain::{Email, OrganizationId},
    error::AppError,
    AppState,
};

/// Accept-invite request body.
#[derive(Debug, Deserialize)]
pub struct AcceptInviteRequest {
    pub token: String,
}

/// POST /invites/accept — Redeem an invitation token. The caller must be
/// authenticated as the invited address; membership insert and invite
/// consumption commit together.
async fn accept(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Json(body): Json<AcceptInviteRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let invite = db::organization_invites::find_by_token(&state.db, &body.token)
        .await?
        .ok_or_else(|| AppError::BadRequest("invite is invalid or has expired".to_string()))?;

    let caller_email = Email::new(identity.email.clone()).map_err(|_| AppError::UserNotFound)?;
    if invite.email != caller_email.as_str() {
        return Err(AppError::AccessDenied);
    }

    let org_id =
        OrganizationId::from_string(&invite.organization_id).map_err(|_| AppError::Internal)?;

    if db::members::find_by_org_and_email(&state.db, &org_id, &caller_email)
        .await?
        .is_some()
    {
        // Already joined; just consume the invite.
        db::organization_invites::delete_by_id(&state.db, &invite.id).await?;
        return Ok(Json(json!({
            "message": "already a member",
            "data": { "organization_id": invite.organization_id }
        })));
    }

    let role = invite
        .role
        .parse()
        .map_err(|_| AppError::Internal)?;

    let member = db::members::NewMember {
        id: ulid::Ulid::new().to_string(),
        organization_id: org_id,
        email: caller_email.clone(),
        display_name: caller_email.local_part().to_string(),
        role,
    };

    let mut tx = state.db.begin().await?;
    db::members::insert(&mut *tx, &member).await?;
    db::organization_invites::delete_by_id(&mut *tx, &invite.id).await?;
    tx.commit().await?;

    Ok(Json(json!({
        "message": "invite accepted",
        "data": { "organization_id": invite.organization_id, "role": invite.role }
    })))
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/invites/accept", post(accept))
        .route_layer(from_fn_with_state(state, auth::middleware::authenticate))
}
