use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::app::{
    auth::{self, authorize::resolve_org_id},
    db,
    domain::{OrganizationRole, RequiredRole},
    error::AppError,
    AppState,
};

/// GET /organizations/:id/members — List the workspace's members.
/// Requires member rank.
async fn list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let org_id = resolve_org_id(&state.db, Some(&id)).await?;
    let members = db::members::list_for_org(&state.db, &org_id).await?;

    let data: Vec<_> = members
        .iter()
        .map(|m| {
            json!({
                "id": m.id,
                "email": m.email,
                "display_name": m.display_name,
                "role": m.role,
            })
        })
        .collect();

    Ok(Json(json!({ "message": "members retrieved", "data": data })))
}

/// Role-change request body.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: OrganizationRole,
}

/// PATCH /organizations/:id/members/:member_id — Change a member's role.
/// Admin rank required; ownership moves only through the transfer endpoint,
/// in either direction: the owner role cannot be assigned here, and the
/// current owner cannot be demoted here — the workspace must never be left
/// ownerless.
async fn update_role(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(String, String)>,
    Json(body): Json<UpdateRoleRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.role == OrganizationRole::Owner {
        return Err(AppError::Validation(
            "ownership is assigned via transfer-ownership".to_string(),
        ));
    }

    let org_id = resolve_org_id(&state.db, Some(&id)).await?;

    let target = db::members::find_by_org_and_id(&state.db, &org_id, &member_id)
        .await?
        .ok_or_else(|| AppError::NotFound("member not found".to_string()))?;

    if target.parsed_role() == Some(OrganizationRole::Owner) {
        return Err(AppError::Validation(
            "ownership is relinquished via transfer-ownership".to_string(),
        ));
    }

    let updated = db::members::update_role(&state.db, &org_id, &member_id, body.role).await?;
    if updated == 0 {
        return Err(AppError::NotFound("member not found".to_string()));
    }

    Ok(Json(json!({ "message": "member role updated", "data": null })))
}

pub fn routes(state: AppState) -> Router<AppState> {
    let list_routes = Router::new()
        .route("/organizations/:id/members", get(list))
        .route_layer(from_fn_with_state(
            (state.clone(), RequiredRole::Org(OrganizationRole::Member)),
            auth::middleware::authorize,
        ))
        .route_layer(from_fn_with_state(
            state.clone(),
            auth::middleware::authenticate,
        ));

    let update_routes = Router::new()
        .route("/organizations/:id/members/:member_id", patch(update_role))
        .route_layer(from_fn_with_state(
            (state.clone(), RequiredRole::Org(OrganizationRole::Admin)),
            auth::middleware::authorize,
        ))
        .route_layer(from_fn_with_state(state, auth::middleware::authenticate));

    list_routes.merge(update_routes)
}
