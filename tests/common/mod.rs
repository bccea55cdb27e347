#![allow(dead_code)]

use axum::body::Body;
use http_body_util::BodyExt;
use parley::app::db;
use parley::app::domain::{
    Email, GlobalRole, HashedPassword, OrganizationId, OrganizationRole, Password, UserId,
};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;

/// One shared in-memory connection: a pool with more than one connection to
/// `sqlite::memory:` would hand each test request a different database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

pub fn test_state(pool: SqlitePool) -> parley::app::AppState {
    let config = parley::app::config::Config::for_tests();
    parley::app::AppState {
        sessions: parley::app::session::SessionStore::new(pool.clone(), &config),
        db: pool,
        mail: std::sync::Arc::new(parley::app::mail::ConsoleMailer),
        config,
    }
}

pub fn test_router(pool: SqlitePool) -> axum::Router {
    parley::create_router(test_state(pool))
}

/// Build a JSON request.
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> http::Request<Body> {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read a response body as JSON.
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

/// Create a user directly in the database. Returns the user ID.
pub async fn create_user(pool: &SqlitePool, email: &str, password: &str) -> UserId {
    create_user_with_role(pool, email, password, GlobalRole::Member).await
}

/// Create a user with an explicit global role.
pub async fn create_user_with_role(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    global_role: GlobalRole,
) -> UserId {
    let email = Email::new(email.to_string()).unwrap();
    let password = Password::new(password.to_string()).unwrap();
    let password_hash = HashedPassword::from_password(&password).unwrap();
    let user_id = UserId::new();

    let new_user = db::users::NewUser {
        id: user_id.clone(),
        email,
        password_hash,
        global_role,
    };
    db::users::insert(pool, &new_user).await.unwrap();
    user_id
}

/// Credentials returned by a successful login.
pub struct Login {
    /// `session_id=<signed value>` for a Cookie header.
    pub cookie: String,
    /// Signed bearer token for an Authorization header.
    pub token: String,
}

/// Log in through the HTTP surface and capture both credential forms.
pub async fn login(app: &axum::Router, email: &str, password: &str) -> Login {
    let request = json_request(
        "POST",
        "/auth/login",
        serde_json::json!({ "email": email, "password": password }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), http::StatusCode::OK, "login should succeed");

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("login sets a session cookie")
        .to_str()
        .unwrap()
        .to_string();
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let body = response_json(response).await;
    let token = body["data"]["token"].as_str().expect("login returns a token").to_string();

    Login { cookie, token }
}

/// Create an organization directly in the database with an owner member.
/// Returns (organization id, slug).
pub async fn seed_org(pool: &SqlitePool, name: &str, owner_email: &str) -> (String, String) {
    let org_id = OrganizationId::new();
    let slug = parley::app::domain::organization_id::workspace_slug(name);
    let owner = Email::new(owner_email.to_string()).unwrap();

    db::organizations::insert(
        pool,
        &db::organizations::NewOrganization {
            id: org_id.clone(),
            name: name.to_string(),
            slug: slug.clone(),
            creator_email: owner.clone(),
        },
    )
    .await
    .unwrap();

    seed_member(pool, &org_id.as_str(), owner_email, OrganizationRole::Owner).await;
    (org_id.as_str(), slug)
}

/// Add a membership record directly.
pub async fn seed_member(pool: &SqlitePool, org_id: &str, email: &str, role: OrganizationRole) {
    let email = Email::new(email.to_string()).unwrap();
    db::members::insert(
        pool,
        &db::members::NewMember {
            id: UserId::new().as_str(),
            organization_id: OrganizationId::from_string(org_id).unwrap(),
            display_name: email.local_part().to_string(),
            email,
            role,
        },
    )
    .await
    .unwrap();
}
