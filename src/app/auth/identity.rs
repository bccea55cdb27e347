//! Identity resolution: merging the cookie-session and bearer-token
//! credential paths into one caller identity, or one terminal failure.

use axum::http::{HeaderMap, Uri};
use axum_extra::extract::cookie::CookieJar;

use crate::app::auth::token::{self, TokenDescriptor};
use crate::app::domain::UserId;
use crate::app::error::AppError;
use crate::app::session::{SessionRecord, SessionStore};

/// Who is making this request. Resolved once per request, attached to the
/// request's extensions, never persisted.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub id: UserId,
    pub email: String,
}

/// Which credential path produced the session in hand. The two paths fail
/// independently; precedence is explicit rather than a shared error check.
enum CredentialSource {
    Cookie(SessionRecord),
    Token {
        descriptor: TokenDescriptor,
        session: SessionRecord,
    },
}

impl CredentialSource {
    fn session(&self) -> &SessionRecord {
        match self {
            CredentialSource::Cookie(session) => session,
            CredentialSource::Token { session, .. } => session,
        }
    }
}

/// Mandatory authentication. Every failure path is terminal and maps to one
/// error kind; a partially-resolved identity never escapes.
///
/// Order: fetch the cookie session (structurally infallible), decode the
/// bearer token, let a recovered descriptor take precedence by refreshing
/// its session from the store, then derive email and identity key from
/// whatever survived.
pub async fn resolve(
    store: &SessionStore,
    token_secret: &[u8],
    jar: &CookieJar,
    headers: &HeaderMap,
    uri: &Uri,
) -> Result<CallerIdentity, AppError> {
    let cookie_session = store.get(jar).await?;
    let descriptor = token::decode_from_request(headers, uri, token_secret);

    let source = match descriptor {
        Some(descriptor) => match store.load(&descriptor.session_id).await? {
            // Descriptor recovered and its session is live: token wins.
            Some(session) => CredentialSource::Token { descriptor, session },
            // Token path dead; the cookie session may still carry identity.
            None if !cookie_session.is_new => CredentialSource::Cookie(cookie_session),
            // Both paths dead.
            None => return Err(AppError::NotAuthorized),
        },
        None => CredentialSource::Cookie(cookie_session),
    };

    // Prefer the email from an external-provider handshake, else whatever
    // the session recorded at login.
    let email = match &source {
        CredentialSource::Token { descriptor, .. } if descriptor.external.is_some() => descriptor
            .external
            .as_ref()
            .map(|ext| ext.email.clone()),
        _ => source.session().email().map(str::to_string),
    };

    let session = source.session();

    // A brand-new session never carries identity, even when a descriptor
    // superficially existed. Stricter outcome wins on ambiguity.
    if session.is_new {
        return Err(AppError::NoAuthToken);
    }

    let email = email.ok_or(AppError::InvalidIdentity)?;

    let id = session
        .user_id()
        .and_then(|key| UserId::from_string(key).ok())
        .ok_or(AppError::InvalidIdentity)?;

    Ok(CallerIdentity { id, email })
}

/// Best-effort authentication for endpoints that personalize for logged-in
/// callers but stay open to everyone. Any failure, of either credential
/// path, resolves to "anonymous" rather than an error.
pub async fn resolve_optional(
    store: &SessionStore,
    token_secret: &[u8],
    jar: &CookieJar,
    headers: &HeaderMap,
    uri: &Uri,
) -> Option<CallerIdentity> {
    match resolve(store, token_secret, jar, headers, uri).await {
        Ok(identity) => Some(identity),
        Err(AppError::Database(err)) => {
            tracing::debug!(%err, "optional authentication skipped on storage error");
            None
        }
        Err(_) => None,
    }
}
