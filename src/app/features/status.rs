use axum::{middleware::from_fn_with_state, routing::get, Extension, Json, Router};
use serde_json::json;

use crate::app::{auth, auth::CallerIdentity, AppState, APP_NAME};

/// GET / — Service status, personalized when credentials are present.
/// Behind the optional gate: anonymous callers get the same envelope with a
/// null user, and a broken credential never fails the request.
async fn index(identity: Option<Extension<CallerIdentity>>) -> Json<serde_json::Value> {
    let user = identity.map(|Extension(identity)| {
        json!({ "id": identity.id.as_str(), "email": identity.email })
    });

    Json(json!({
        "message": format!("{} API", APP_NAME),
        "data": { "user": user }
    }))
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route_layer(from_fn_with_state(
            state,
            auth::middleware::authenticate_optional,
        ))
}
