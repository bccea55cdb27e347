use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::app::{
    auth,
    db::{self, organizations::Organization},
    domain::{OrganizationRef, OrganizationRole, RequiredRole},
    error::AppError,
    AppState,
};

fn org_json(org: &Organization) -> serde_json::Value {
    json!({
        "id": org.id,
        "name": org.name,
        "slug": org.slug,
        "creator_email": org.creator_email,
        "created_at": org.created_at,
    })
}

/// GET /organizations/:id — Fetch one workspace by primary key or slug.
/// Requires at least guest membership; the gate already resolved the
/// identifier form, and the same branch repeats here for the read.
async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let org = match OrganizationRef::parse(&id) {
        Some(OrganizationRef::Id(org_id)) => {
            db::organizations::find_by_id(&state.db, &org_id).await?
        }
        Some(OrganizationRef::Slug(slug)) => {
            db::organizations::find_by_slug(&state.db, &slug).await?
        }
        None => return Err(AppError::BadRequest("invalid organization id".to_string())),
    };

    let org = org.ok_or_else(|| AppError::NotFound("organization not found".to_string()))?;

    Ok(Json(json!({
        "message": "organization retrieved",
        "data": org_json(&org)
    })))
}

/// GET /organizations — List every workspace. Platform-admin only.
async fn list(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let orgs = db::organizations::list(&state.db).await?;
    let data: Vec<_> = orgs.iter().map(org_json).collect();

    Ok(Json(json!({
        "message": "organizations retrieved",
        "data": data
    })))
}

pub fn routes(state: AppState) -> Router<AppState> {
    let get_one_routes = Router::new()
        .route("/organizations/:id", get(get_one))
        .route_layer(from_fn_with_state(
            (state.clone(), RequiredRole::Org(OrganizationRole::Guest)),
            auth::middleware::authorize,
        ))
        .route_layer(from_fn_with_state(
            state.clone(),
            auth::middleware::authenticate,
        ));

    let list_routes = Router::new()
        .route("/organizations", get(list))
        .route_layer(from_fn_with_state(
            (state.clone(), RequiredRole::GlobalAdmin),
            auth::middleware::authorize,
        ))
        .route_layer(from_fn_with_state(state, auth::middleware::authenticate));

    get_one_routes.merge(list_routes)
}
