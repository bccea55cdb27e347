pub mod app;

use std::time::Duration;

use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the full application router. Used by main and by integration
/// tests. The timeout layer bounds every store call a request makes; a
/// request dropped by the client cancels its in-flight work.
pub fn create_router(state: app::AppState) -> Router {
    Router::new()
        .merge(app::routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(state)
}
