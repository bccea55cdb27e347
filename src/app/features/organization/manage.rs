use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::delete,
    Json, Router,
};
use serde_json::json;

use crate::app::{
    auth::{self, authorize::resolve_org_id},
    db,
    domain::{OrganizationRole, RequiredRole},
    error::AppError,
    AppState,
};

/// DELETE /organizations/:id — Delete a workspace and all of its
/// membership records in one transaction. Owner only.
async fn delete_org(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let org_id = resolve_org_id(&state.db, Some(&id)).await?;

    let mut tx = state.db.begin().await?;
    db::members::delete_for_org(&mut *tx, &org_id).await?;
    let deleted = db::organizations::delete(&mut *tx, &org_id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("organization not found".to_string()));
    }
    tx.commit().await?;

    Ok(Json(json!({ "message": "organization deleted", "data": null })))
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/organizations/:id", delete(delete_org))
        .route_layer(from_fn_with_state(
            (state.clone(), RequiredRole::Org(OrganizationRole::Owner)),
            auth::middleware::authorize,
        ))
        .route_layer(from_fn_with_state(state, auth::middleware::authenticate))
}
