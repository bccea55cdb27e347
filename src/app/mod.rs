use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;

/// Human-readable application name, used in responses and mail.
pub const APP_NAME: &str = "Parley";

/// Shared state available to all handlers and middleware via Axum's state
/// extractor. Store handles are connection-pooled and safe to share across
/// concurrent requests; nothing here caches authorization data.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub sessions: session::SessionStore,
    pub mail: Arc<dyn mail::EmailSender>,
    pub config: config::Config,
}

/// App routes. Merged into the top-level router in lib.rs.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(features::status::routes(state.clone()))
        .merge(features::auth::routes(state.clone()))
        .merge(features::organization::routes(state.clone()))
        .merge(features::invites::routes(state.clone()))
        .merge(features::reports::routes(state))
}

pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod features;
pub mod mail;
pub mod session;
