//! API server configuration.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Default access token lifetime in seconds.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Default bound on credential lookup and token signing, in milliseconds.
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5000;

/// Startup configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not a valid number: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3100").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Optional `iss` claim stamped into and required on tokens.
    pub jwt_issuer: Option<String>,
    /// Access token lifetime.
    pub token_ttl: Duration,
    /// Per-call bound on lookup and signing.
    pub lookup_timeout: Duration,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &redact_url_userinfo(&self.database_url))
            .field("jwt_secret", &"<redacted>")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("token_ttl", &self.token_ttl)
            .field("lookup_timeout", &self.lookup_timeout)
            .finish()
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable            | Default                            |
    /// |---------------------|------------------------------------|
    /// | `BIND_ADDR`         | `127.0.0.1:3100`                   |
    /// | `DATABASE_URL`      | `postgres://localhost:5432/keyward` |
    /// | `JWT_SECRET`        | required                           |
    /// | `JWT_ISSUER`        | unset                              |
    /// | `TOKEN_TTL_SECS`    | `3600`                             |
    /// | `LOOKUP_TIMEOUT_MS` | `5000`                             |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ApiConfig::from_env`] but reading through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        Ok(Self {
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3100".into()),
            database_url: non_empty("DATABASE_URL")
                .unwrap_or_else(|| "postgres://localhost:5432/keyward".into()),
            jwt_secret: resolve_jwt_secret(non_empty("JWT_SECRET"))?,
            jwt_issuer: non_empty("JWT_ISSUER"),
            token_ttl: Duration::from_secs(parse_u64(
                "TOKEN_TTL_SECS",
                non_empty("TOKEN_TTL_SECS"),
                DEFAULT_TOKEN_TTL_SECS,
            )?),
            lookup_timeout: Duration::from_millis(parse_u64(
                "LOOKUP_TIMEOUT_MS",
                non_empty("LOOKUP_TIMEOUT_MS"),
                DEFAULT_LOOKUP_TIMEOUT_MS,
            )?),
        })
    }
}

/// The signing secret is mandatory; there is no generated fallback.
pub fn resolve_jwt_secret(value: Option<String>) -> Result<String, ConfigError> {
    value
        .filter(|s| !s.trim().is_empty())
        .ok_or(ConfigError::Missing("JWT_SECRET"))
}

/// Replace the `user:password` part of a connection URL with `<redacted>`.
pub fn redact_url_userinfo(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{scheme}://<redacted>{}", &rest[at..]),
        None => url.to_string(),
    }
}

fn parse_u64(name: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value: v }),
    }
}
