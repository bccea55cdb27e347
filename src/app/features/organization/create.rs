use axum::{
    extract::State, http::StatusCode, middleware::from_fn_with_state, routing::post, Extension,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::app::{
    auth::{self, CallerIdentity},
    db,
    domain::{organization_id::workspace_slug, Email, OrganizationId, OrganizationRole},
    error::AppError,
    AppState,
};

/// Create-organization request body.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// POST /organizations — Create a workspace. The creator becomes its owner
/// member; both writes commit together.
async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Json(body): Json<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    body.validate()
        .map_err(|_| AppError::Validation("invalid organization name".to_string()))?;

    let creator_email =
        Email::new(identity.email.clone()).map_err(|_| AppError::UserNotFound)?;

    if db::users::find_by_email(&state.db, &creator_email).await?.is_none() {
        return Err(AppError::UserNotFound);
    }

    let org_id = OrganizationId::new();
    let slug = workspace_slug(&body.name);

    let new_org = db::organizations::NewOrganization {
        id: org_id.clone(),
        name: body.name.trim().to_string(),
        slug: slug.clone(),
        creator_email: creator_email.clone(),
    };

    let owner = db::members::NewMember {
        id: ulid::Ulid::new().to_string(),
        organization_id: org_id.clone(),
        email: creator_email.clone(),
        display_name: creator_email.local_part().to_string(),
        role: OrganizationRole::Owner,
    };

    let mut tx = state.db.begin().await?;
    db::organizations::insert(&mut *tx, &new_org).await?;
    db::members::insert(&mut *tx, &owner).await?;
    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "organization created",
            "data": { "organization_id": org_id.as_str(), "slug": slug }
        })),
    ))
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/organizations", post(create))
        .route_layer(from_fn_with_state(state, auth::middleware::authenticate))
}
