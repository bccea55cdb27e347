pub mod login;
pub mod logout;
pub mod me;
pub mod signup;

use axum::Router;

use crate::app::AppState;

/// Authentication routes.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(signup::routes())
        .merge(login::routes())
        .merge(logout::routes(state.clone()))
        .merge(me::routes(state))
}
