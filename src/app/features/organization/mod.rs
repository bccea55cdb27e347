pub mod billing;
pub mod create;
pub mod get;
pub mod manage;
pub mod members;
pub mod transfer;

use axum::Router;

use crate::app::AppState;

/// Organization routes. Every group carries its own gate from the
/// middleware chain; see each submodule for the required role.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(create::routes(state.clone()))
        .merge(get::routes(state.clone()))
        .merge(manage::routes(state.clone()))
        .merge(members::routes(state.clone()))
        .merge(transfer::routes(state.clone()))
        .merge(billing::routes(state))
}
