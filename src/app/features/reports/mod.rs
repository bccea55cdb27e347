pub mod create;
pub mod get;

use axum::Router;

use crate::app::AppState;

/// Abuse-report routes: members file reports, admins read them.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(create::routes(state.clone()))
        .merge(get::routes(state))
}
