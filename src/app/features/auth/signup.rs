use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::app::{
    db,
    domain::{Email, GlobalRole, HashedPassword, Password, UserId},
    error::AppError,
    AppState,
};

/// Signup request body.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 254), email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// POST /auth/signup — Create a user account.
async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    body.validate()
        .map_err(|_| AppError::Validation("invalid signup data".to_string()))?;

    let email = Email::new(body.email)
        .map_err(|e| AppError::Validation(e.message.map(|m| m.to_string()).unwrap_or_default()))?;
    let password = Password::new(body.password)
        .map_err(|e| AppError::Validation(e.message.map(|m| m.to_string()).unwrap_or_default()))?;

    if db::users::find_by_email(&state.db, &email).await?.is_some() {
        // Same envelope as other validation failures; do not reveal which
        // addresses hold accounts.
        return Err(AppError::Auth(
            "unable to create account with these details".to_string(),
        ));
    }

    let password_hash = HashedPassword::from_password(&password).map_err(|_| AppError::Internal)?;
    let user_id = UserId::new();

    let new_user = db::users::NewUser {
        id: user_id.clone(),
        email: email.clone(),
        password_hash,
        global_role: GlobalRole::Member,
    };
    db::users::insert(&state.db, &new_user).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "user created",
            "data": { "id": user_id.as_str(), "email": email.as_str() }
        })),
    ))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/signup", post(signup))
}
