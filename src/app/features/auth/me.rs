use axum::{middleware::from_fn_with_state, routing::get, Extension, Json, Router};
use serde_json::json;

use crate::app::{auth, auth::CallerIdentity, AppState};

/// GET /auth/me — The resolved identity for the current credentials. Mostly
/// useful for clients verifying a stored token is still accepted.
async fn me(Extension(identity): Extension<CallerIdentity>) -> Json<serde_json::Value> {
    Json(json!({
        "message": "authenticated",
        "data": { "id": identity.id.as_str(), "email": identity.email }
    }))
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me))
        .route_layer(from_fn_with_state(state, auth::middleware::authenticate))
}
