use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::post,
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::app::{
    auth::{self, authorize::resolve_org_id, CallerIdentity},
    db,
    domain::{Email, OrganizationRole, RequiredRole},
    error::AppError,
    AppState,
};

/// Report submission body. The reporter is the authenticated caller; only
/// the offender is named explicitly.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReportRequest {
    pub offender_email: String,

    #[validate(length(min = 1, max = 200))]
    pub subject: String,

    #[validate(length(min = 1, max = 5000))]
    pub body: String,
}

/// POST /organizations/:id/reports — File an abuse report against another
/// member of the workspace. Member rank required; the offender must also be
/// a member, so reports never reference addresses outside the workspace.
async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Path(id): Path<String>,
    Json(body): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    body.validate()
        .map_err(|_| AppError::Validation("report subject and body are required".to_string()))?;

    let org_id = resolve_org_id(&state.db, Some(&id)).await?;

    let offender = Email::new(body.offender_email)
        .map_err(|_| AppError::Validation("email is not valid".to_string()))?;

    if db::members::find_by_org_and_email(&state.db, &org_id, &offender)
        .await?
        .is_none()
    {
        return Err(AppError::BadRequest(
            "reported user must be a member of this workspace".to_string(),
        ));
    }

    let reporter = Email::new(identity.email.clone()).map_err(|_| AppError::UserNotFound)?;

    let report = db::organization_reports::NewOrganizationReport {
        id: ulid::Ulid::new().to_string(),
        organization_id: org_id,
        reporter_email: reporter,
        offender_email: offender,
        subject: body.subject,
        body: body.body,
    };
    db::organization_reports::insert(&state.db, &report).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "report created",
            "data": { "report_id": report.id }
        })),
    ))
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/organizations/:id/reports", post(create))
        .route_layer(from_fn_with_state(
            (state.clone(), RequiredRole::Org(OrganizationRole::Member)),
            auth::middleware::authorize,
        ))
        .route_layer(from_fn_with_state(state, auth::middleware::authenticate))
}
