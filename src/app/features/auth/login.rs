use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::app::{
    auth::token::{self, TokenDescriptor},
    db,
    domain::{Email, HashedPassword, Password, UserId},
    error::AppError,
    AppState,
};

/// Login request body.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254), email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// POST /auth/login — Verify credentials, start a session, and return both
/// credential forms: a Set-Cookie for browsers and a signed bearer token
/// for stateless clients. The token's descriptor points at the same session
/// the cookie names.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()
        .map_err(|_| AppError::Validation("invalid login data".to_string()))?;

    let email = Email::new(body.email)
        .map_err(|_| AppError::Auth("invalid email or password".to_string()))?;
    // Verification only; strength rules apply at signup.
    let password = Password::for_verification(body.password);

    let user = db::users::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::Auth("invalid email or password".to_string()))?;

    HashedPassword::from_string(user.password_hash.clone())
        .verify(&password)
        .map_err(|_| AppError::Auth("invalid email or password".to_string()))?;

    let user_id = UserId::from_string(&user.id).map_err(|_| AppError::Internal)?;

    let mut record = state.sessions.fresh();
    record.set_identity(&user_id, &email);
    let cookie = state.sessions.save(&record).await?;

    let descriptor = TokenDescriptor {
        cookie_value: cookie.value().to_string(),
        session_id: record.session_id.clone(),
        email: email.as_str().to_string(),
        session_name: state.sessions.cookie_name().to_string(),
        external: None,
    };
    let bearer = token::encode(&descriptor, state.config.token_secret.as_bytes());

    let body = Json(json!({
        "message": "login successful",
        "data": {
            "token": bearer,
            "user": { "id": user_id.as_str(), "email": email.as_str() }
        }
    }));

    Ok((jar.add(cookie), body))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}
