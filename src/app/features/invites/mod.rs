pub mod accept;
pub mod create;

use axum::Router;

use crate::app::AppState;

/// Invitation routes: issuing (admin-gated) and accepting (any
/// authenticated user holding a valid token).
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(create::routes(state.clone()))
        .merge(accept::routes(state))
}
