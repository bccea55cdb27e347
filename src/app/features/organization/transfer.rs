use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::post,
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::app::{
    auth::{self, authorize::resolve_org_id, CallerIdentity},
    db,
    domain::{Email, OrganizationRole, RequiredRole},
    error::AppError,
    mail::{self, Notification},
    AppState,
};

/// Transfer-ownership request body: the proposed new owner.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub email: String,
}

/// POST /organizations/:id/transfer-ownership — Promote an existing member
/// to owner and demote the current owner to admin, atomically. Owner only;
/// the gate has already established the caller's rank.
async fn transfer(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Path(id): Path<String>,
    Json(body): Json<TransferRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let org_id = resolve_org_id(&state.db, Some(&id)).await?;

    let new_owner_email = Email::new(body.email)
        .map_err(|_| AppError::Validation("email is not valid".to_string()))?;

    let new_owner = db::members::find_by_org_and_email(&state.db, &org_id, &new_owner_email)
        .await?
        .ok_or_else(|| AppError::BadRequest("user is not a member of this workspace".to_string()))?;

    if new_owner.parsed_role() == Some(OrganizationRole::Owner) {
        return Err(AppError::BadRequest(
            "this member already owns this organization".to_string(),
        ));
    }

    let caller_email = Email::new(identity.email.clone()).map_err(|_| AppError::UserNotFound)?;
    let former_owner = db::members::find_by_org_and_email(&state.db, &org_id, &caller_email)
        .await?
        .ok_or(AppError::AccessDenied)?;

    let mut tx = state.db.begin().await?;
    let promoted =
        db::members::update_role(&mut *tx, &org_id, &new_owner.id, OrganizationRole::Owner).await?;
    let demoted =
        db::members::update_role(&mut *tx, &org_id, &former_owner.id, OrganizationRole::Admin)
            .await?;
    if promoted == 0 || demoted == 0 {
        return Err(AppError::Internal);
    }
    tx.commit().await?;

    if let Some(org) = db::organizations::find_by_id(&state.db, &org_id).await? {
        let message = Notification::OwnershipTransfer { org_name: org.name }
            .into_message(new_owner_email, &state.config);
        mail::dispatch(state.mail.clone(), message);
    }

    Ok(Json(json!({
        "message": "workspace owner changed successfully",
        "data": null
    })))
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/organizations/:id/transfer-ownership", post(transfer))
        .route_layer(from_fn_with_state(
            (state.clone(), RequiredRole::Org(OrganizationRole::Owner)),
            auth::middleware::authorize,
        ))
        .route_layer(from_fn_with_state(state, auth::middleware::authenticate))
}
