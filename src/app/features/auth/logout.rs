use axum::{
    extract::State,
    http::{HeaderMap, Uri},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::app::{auth, error::AppError, AppState};

/// POST /auth/logout — Invalidate the caller's session. Works for both
/// credential forms: the session ID comes from the cookie when present,
/// otherwise from the bearer token's descriptor.
async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    uri: Uri,
) -> Result<impl IntoResponse, AppError> {
    let session_id = match jar
        .get(state.sessions.cookie_name())
        .and_then(|cookie| state.sessions.verify_cookie_value(cookie.value()))
    {
        Some(id) => Some(id),
        None => auth::token::decode_from_request(&headers, &uri, state.config.token_secret.as_bytes())
            .map(|descriptor| descriptor.session_id),
    };

    if let Some(session_id) = session_id {
        state.sessions.destroy(&session_id).await?;
    }

    let jar = jar.add(state.sessions.clear_cookie());
    Ok((jar, Json(json!({ "message": "logged out", "data": null }))))
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route_layer(from_fn_with_state(state, auth::middleware::authenticate))
}
