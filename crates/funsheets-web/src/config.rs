//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use axum::http::HeaderName;
use database::StatusPolicy;

/// Headers the fronting identity provider uses to pass the signed-in user.
#[derive(Debug, Clone)]
pub struct AuthHeaders {
    pub user_id: HeaderName,
    pub email: HeaderName,
}

impl Default for AuthHeaders {
    fn default() -> Self {
        Self {
            user_id: HeaderName::from_static("x-auth-user-id"),
            email: HeaderName::from_static("x-auth-email"),
        }
    }
}

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Identity headers.
    pub auth: AuthHeaders,
    /// Artificial latency added to worksheet generation, in milliseconds.
    pub generation_delay_ms: u64,
    /// Whether worksheets may move back to an earlier status.
    pub status_policy: StatusPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `FUNSHEETS_ADDR` | Server bind address | `127.0.0.1:8790` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:funsheets.db?mode=rwc` |
    /// | `AUTH_USER_HEADER` | Header carrying the auth user id | `x-auth-user-id` |
    /// | `AUTH_EMAIL_HEADER` | Header carrying the auth email | `x-auth-email` |
    /// | `GENERATION_DELAY_MS` | Generator latency | `0` |
    /// | `STATUS_POLICY` | `forward-only` or `permissive` | `forward-only` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = var("FUNSHEETS_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8790".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            var("SQLITE_PATH").unwrap_or_else(|| "sqlite:funsheets.db?mode=rwc".to_string());

        let defaults = AuthHeaders::default();
        let auth = AuthHeaders {
            user_id: header_var(&var, "AUTH_USER_HEADER", defaults.user_id)?,
            email: header_var(&var, "AUTH_EMAIL_HEADER", defaults.email)?,
        };

        let generation_delay_ms = match var("GENERATION_DELAY_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber("GENERATION_DELAY_MS"))?,
            None => 0,
        };

        let status_policy = match var("STATUS_POLICY") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidStatusPolicy(raw))?,
            None => StatusPolicy::default(),
        };

        Ok(Self {
            addr,
            database_url,
            auth,
            generation_delay_ms,
            status_policy,
        })
    }
}

fn header_var(
    var: impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: HeaderName,
) -> Result<HeaderName, ConfigError> {
    match var(name) {
        Some(raw) => HeaderName::try_from(raw.trim().to_lowercase())
            .map_err(|_| ConfigError::InvalidHeader(name)),
        None => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid FUNSHEETS_ADDR format")]
    InvalidAddr,

    #[error("{0} must be a valid HTTP header name")]
    InvalidHeader(&'static str),

    #[error("{0} must be a non-negative integer")]
    InvalidNumber(&'static str),

    #[error("Unknown STATUS_POLICY '{0}' (expected forward-only or permissive)")]
    InvalidStatusPolicy(String),
}
