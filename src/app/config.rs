/// Centralized environment configuration.
/// All env vars and defaults are defined here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL. Required.
    pub database_url: String,

    /// Secret for signing session cookies. Required.
    pub secret_key: String,

    /// Secret for signing stateless bearer tokens. Required.
    /// Kept separate from `secret_key` so either can be rotated alone.
    pub token_secret: String,

    /// Name of the session cookie.
    /// Default: session_id
    pub session_key: String,

    /// Session lifetime in seconds.
    /// Default: 30 days
    pub session_max_age_secs: i64,

    /// Mark the session cookie Secure (HTTPS only).
    /// Default: false (local development)
    pub cookie_secure: bool,

    /// Base URL for generating links in emails.
    /// Default: http://localhost:3000
    pub app_url: String,

    /// From/reply address for outgoing emails.
    /// Default: please-configure@example.com
    pub mail_from: String,

    /// Mail adapter: "console" or "smtp".
    /// Default: console
    pub mail_adapter: String,

    /// SMTP host. Required when mail_adapter=smtp.
    pub smtp_host: Option<String>,

    /// SMTP port.
    /// Default: 587
    pub smtp_port: u16,

    /// SMTP username. Optional for some servers.
    pub smtp_user: Option<String>,

    /// SMTP password. Optional for some servers.
    pub smtp_pass: Option<String>,
}

impl Config {
    /// Build config from environment variables.
    /// Returns an error if required vars are missing.
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set in .env")?;

        let secret_key =
            std::env::var("SECRET_KEY").map_err(|_| "SECRET_KEY must be set in .env")?;

        let token_secret =
            std::env::var("TOKEN_SECRET").map_err(|_| "TOKEN_SECRET must be set in .env")?;

        let session_key =
            std::env::var("SESSION_KEY").unwrap_or_else(|_| "session_id".to_string());

        let session_max_age_secs = std::env::var("SESSION_MAX_AGE_SECS")
            .unwrap_or_else(|_| (60 * 60 * 24 * 30).to_string())
            .parse::<i64>()
            .map_err(|_| "SESSION_MAX_AGE_SECS must be a number of seconds")?;

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let app_url =
            std::env::var("APP_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let mail_from = std::env::var("MAIL_FROM")
            .unwrap_or_else(|_| "please-configure@example.com".to_string());

        let mail_adapter =
            std::env::var("MAIL_ADAPTER").unwrap_or_else(|_| "console".to_string());

        let smtp_host = std::env::var("SMTP_HOST").ok();
        let smtp_port = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .map_err(|_| "SMTP_PORT must be a valid port number")?;
        let smtp_user = std::env::var("SMTP_USER").ok();
        let smtp_pass = std::env::var("SMTP_PASS").ok();

        Ok(Self {
            database_url,
            secret_key,
            token_secret,
            session_key,
            session_max_age_secs,
            cookie_secure,
            app_url,
            mail_from,
            mail_adapter,
            smtp_host,
            smtp_port,
            smtp_user,
            smtp_pass,
        })
    }

    /// Returns the base URL without trailing slash, for building links.
    pub fn app_url_base(&self) -> &str {
        self.app_url.trim_end_matches('/')
    }

    /// Config for tests. In-memory database, console mailer, fixed secrets.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            secret_key: "test-cookie-secret".to_string(),
            token_secret: "test-token-secret".to_string(),
            session_key: "session_id".to_string(),
            session_max_age_secs: 60 * 60 * 24 * 30,
            cookie_secure: false,
            app_url: "http://localhost:3000".to_string(),
            mail_from: "test@example.com".to_string(),
            mail_adapter: "console".to_string(),
            smtp_host: None,
            smtp_port: 587,
            smtp_user: None,
            smtp_pass: None,
        }
    }
}
