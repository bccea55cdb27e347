//! Server-side session store backed by the sessions table.
//!
//! The cookie holds a signed value `<session_id>.<hmac-sha256 hex>`; the
//! record itself lives in the database. `get` never fails structurally: a
//! missing, malformed, or unverifiable cookie yields a fresh empty record
//! with `is_new = true`, which is itself the checkable "no identity" state.

use std::collections::BTreeMap;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use sqlx::SqlitePool;
use time::{Duration, OffsetDateTime};

use crate::app::config::Config;
use crate::app::db;
use crate::app::domain::{Email, UserId};
use crate::app::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Session key under which the caller's identity key is stored.
const USER_ID_KEY: &str = "user_id";
/// Session key under which the caller's email is stored.
const EMAIL_KEY: &str = "email";

/// One session: an ID, a bag of values, and whether it was just minted.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub session_id: String,
    pub values: BTreeMap<String, serde_json::Value>,
    pub is_new: bool,
    pub max_age: Duration,
}

impl SessionRecord {
    /// Email recorded in the session values, if any.
    pub fn email(&self) -> Option<&str> {
        self.values.get(EMAIL_KEY).and_then(|v| v.as_str())
    }

    /// Identity key recorded in the session values, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.values.get(USER_ID_KEY).and_then(|v| v.as_str())
    }

    /// Record the caller's identity in the session values.
    pub fn set_identity(&mut self, user_id: &UserId, email: &Email) {
        self.values
            .insert(USER_ID_KEY.to_string(), serde_json::Value::String(user_id.as_str()));
        self.values
            .insert(EMAIL_KEY.to_string(), serde_json::Value::String(email.as_str().to_string()));
    }
}

/// Concurrency-safe handle to session storage, initialized once at startup
/// and passed explicitly to the middleware (injected, never a singleton).
#[derive(Clone)]
pub struct SessionStore {
    pool: SqlitePool,
    secret: Vec<u8>,
    cookie_name: String,
    max_age: Duration,
    secure: bool,
}

impl SessionStore {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            secret: config.secret_key.as_bytes().to_vec(),
            cookie_name: config.session_key.clone(),
            max_age: Duration::seconds(config.session_max_age_secs),
            secure: config.cookie_secure,
        }
    }

    /// Name of the session cookie this store reads and writes.
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Fetch the session for a request. Structurally infallible: every path
    /// that cannot produce a verified, live session yields a fresh record
    /// with `is_new = true`. Only storage transport errors propagate.
    pub async fn get(&self, jar: &CookieJar) -> Result<SessionRecord, AppError> {
        let Some(cookie) = jar.get(&self.cookie_name) else {
            return Ok(self.fresh());
        };

        let Some(session_id) = self.verify_cookie_value(cookie.value()) else {
            return Ok(self.fresh());
        };

        match self.load(&session_id).await? {
            Some(record) => Ok(record),
            None => Ok(self.fresh()),
        }
    }

    /// Load a live session row by ID. Used by the token path to refresh a
    /// session from a descriptor's session identifier.
    pub async fn load(&self, session_id: &str) -> Result<Option<SessionRecord>, AppError> {
        let Some(row) = db::sessions::find_valid(&self.pool, session_id).await? else {
            return Ok(None);
        };

        // A row with corrupt JSON is unusable; treat it as absent rather
        // than trusting partial data.
        let Ok(values) = serde_json::from_str(&row.data) else {
            return Ok(None);
        };

        Ok(Some(SessionRecord {
            session_id: row.id,
            values,
            is_new: false,
            max_age: self.max_age,
        }))
    }

    /// Persist the record and return the signed cookie to set on the
    /// response. Upserts so that saving a fresh record and re-saving an
    /// existing one go through the same path.
    pub async fn save(&self, record: &SessionRecord) -> Result<Cookie<'static>, AppError> {
        let data = serde_json::to_string(&record.values).map_err(|_| AppError::Internal)?;
        let expires_at = OffsetDateTime::now_utc() + record.max_age;

        if record.is_new {
            db::sessions::insert(&self.pool, &record.session_id, &data, expires_at).await?;
        } else {
            db::sessions::update_data(&self.pool, &record.session_id, &data, expires_at).await?;
        }

        Ok(self.cookie(self.sign_cookie_value(&record.session_id)))
    }

    /// Drop the backing row (logout). The cleared cookie is separate; see
    /// [`SessionStore::clear_cookie`].
    pub async fn destroy(&self, session_id: &str) -> Result<(), AppError> {
        db::sessions::delete(&self.pool, session_id).await?;
        Ok(())
    }

    /// A removal cookie for logout responses.
    pub fn clear_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), ""))
            .path("/")
            .removal()
            .into()
    }

    /// Signed cookie value for a session ID, exposed so login can hand the
    /// value to the token codec as the descriptor's `cookie_value`.
    pub fn sign_cookie_value(&self, session_id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC accepts keys of any length");
        mac.update(session_id.as_bytes());
        format!("{}.{}", session_id, hex::encode(mac.finalize().into_bytes()))
    }

    /// Verify a signed cookie value, returning the session ID it names.
    /// Any structural or signature failure yields `None`.
    pub fn verify_cookie_value(&self, value: &str) -> Option<String> {
        let (session_id, signature) = value.rsplit_once('.')?;
        let expected = hex::decode(signature).ok()?;

        let mut mac = HmacSha256::new_from_slice(&self.secret).ok()?;
        mac.update(session_id.as_bytes());
        mac.verify_slice(&expected).ok()?;

        Some(session_id.to_string())
    }

    /// Mint a brand-new empty record. Not yet persisted; `save` writes it.
    pub fn fresh(&self) -> SessionRecord {
        SessionRecord {
            session_id: UserId::new().as_str(),
            values: BTreeMap::new(),
            is_new: true,
            max_age: self.max_age,
        }
    }

    fn cookie(&self, value: String) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), value))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(self.max_age)
            .build()
    }
}
