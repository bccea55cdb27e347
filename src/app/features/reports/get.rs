use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::app::{
    auth::{self, authorize::resolve_org_id},
    db::{self, organization_reports::OrganizationReport},
    domain::{OrganizationRole, RequiredRole},
    error::AppError,
    AppState,
};

fn report_json(report: &OrganizationReport) -> serde_json::Value {
    json!({
        "id": report.id,
        "reporter_email": report.reporter_email,
        "offender_email": report.offender_email,
        "subject": report.subject,
        "body": report.body,
        "created_at": report.created_at,
    })
}

/// GET /organizations/:id/reports — List the workspace's reports, newest
/// first. Admin rank required.
async fn list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let org_id = resolve_org_id(&state.db, Some(&id)).await?;
    let reports = db::organization_reports::list_for_org(&state.db, &org_id).await?;

    let data: Vec<_> = reports.iter().map(report_json).collect();

    Ok(Json(json!({ "message": "reports retrieved", "data": data })))
}

/// GET /organizations/:id/reports/:report_id — Fetch one report. Admin rank
/// required; the lookup is scoped to the workspace so a report ID from
/// another workspace is simply not found.
async fn get_one(
    State(state): State<AppState>,
    Path((id, report_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    if ulid::Ulid::from_string(&report_id).is_err() {
        return Err(AppError::BadRequest("invalid report id".to_string()));
    }

    let org_id = resolve_org_id(&state.db, Some(&id)).await?;

    let report = db::organization_reports::find_by_org_and_id(&state.db, &org_id, &report_id)
        .await?
        .ok_or_else(|| AppError::NotFound("report not found".to_string()))?;

    Ok(Json(json!({
        "message": "report retrieved",
        "data": report_json(&report)
    })))
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/organizations/:id/reports", get(list))
        .route("/organizations/:id/reports/:report_id", get(get_one))
        .route_layer(from_fn_with_state(
            (state.clone(), RequiredRole::Org(OrganizationRole::Admin)),
            auth::middleware::authorize,
        ))
        .route_layer(from_fn_with_state(state, auth::middleware::authenticate))
}
