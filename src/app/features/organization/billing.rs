use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::patch,
    Json, Router,
};
use serde_json::json;

use crate::app::{
    auth::{self, authorize::resolve_org_id},
    db::{self, organizations::BillingColumn},
    domain::{OrganizationRole, RequiredRole},
    error::AppError,
    AppState,
};

/// Shared body handling for the two billing endpoints: the payload is an
/// opaque JSON object owned by the billing collaborator; this backend only
/// validates that it is an object and stores it verbatim.
async fn update(
    state: &AppState,
    id: &str,
    column: BillingColumn,
    body: serde_json::Value,
) -> Result<Json<serde_json::Value>, AppError> {
    if !body.is_object() {
        return Err(AppError::Validation("expected a JSON object".to_string()));
    }

    let org_id = resolve_org_id(&state.db, Some(id)).await?;
    let serialized = body.to_string();

    let updated =
        db::organizations::update_billing(&state.db, &org_id, column, &serialized).await?;
    if updated == 0 {
        return Err(AppError::NotFound("organization not found".to_string()));
    }

    Ok(Json(json!({ "message": "billing updated", "data": body })))
}

/// PATCH /organizations/:id/billing/settings
async fn update_settings(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, AppError> {
    update(&state, &id, BillingColumn::Setting, body).await
}

/// PATCH /organizations/:id/billing/contact
async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, AppError> {
    update(&state, &id, BillingColumn::Contact, body).await
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/organizations/:id/billing/settings", patch(update_settings))
        .route("/organizations/:id/billing/contact", patch(update_contact))
        .route_layer(from_fn_with_state(
            (state.clone(), RequiredRole::Org(OrganizationRole::Admin)),
            auth::middleware::authorize,
        ))
        .route_layer(from_fn_with_state(state, auth::middleware::authenticate))
}
