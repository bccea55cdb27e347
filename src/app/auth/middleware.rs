//! The three request gates, composed with `axum::middleware::from_fn_with_state`.
//!
//! Per request the mandatory path walks: session fetched → token decoded or
//! absent → identity resolved or denied → (optionally) authorized or denied
//! → handler invoked. Denials are terminal JSON responses; a handler never
//! sees a partially resolved identity.

use std::collections::HashMap;

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::app::auth::{authorize, identity, CallerIdentity};
use crate::app::domain::RequiredRole;
use crate::app::error::AppError;
use crate::app::AppState;

/// Mandatory authentication: resolve a caller identity and inject it into
/// the request extensions, or end the request with 401.
pub async fn authenticate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = identity::resolve(
        &state.sessions,
        state.config.token_secret.as_bytes(),
        &jar,
        req.headers(),
        req.uri(),
    )
    .await?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Mandatory authentication and authorization. Expects the identity already
/// injected by an outer [`authenticate`] layer, evaluates the role
/// requirement against the store, and replaces the context identity with
/// the membership-scoped one.
pub async fn authorize(
    State((state, required)): State<(AppState, RequiredRole)>,
    params: Option<Path<HashMap<String, String>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Globally-scoped routes have no captures at all.
    let params = params.map(|Path(p)| p).unwrap_or_default();

    let identity = req
        .extensions()
        .get::<CallerIdentity>()
        .cloned()
        .ok_or(AppError::NotAuthorized)?;

    let scoped = authorize::evaluate(
        &state.db,
        &identity,
        params.get("id").map(String::as_str),
        required,
    )
    .await?;

    req.extensions_mut().insert(scoped);
    Ok(next.run(req).await)
}

/// Best-effort authentication. On any failure or empty identity the
/// original request is forwarded unchanged; the handler sees no identity
/// extension and treats the caller as anonymous.
pub async fn authenticate_optional(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(identity) = identity::resolve_optional(
        &state.sessions,
        state.config.token_secret.as_bytes(),
        &jar,
        req.headers(),
        req.uri(),
    )
    .await
    {
        req.extensions_mut().insert(identity);
    }

    next.run(req).await
}
