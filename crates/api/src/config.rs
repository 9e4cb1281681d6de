use std::str::FromStr;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use social_core::types::DbId;
use social_db::PoolSettings;
use tower_http::cors::CorsLayer;

/// Header carrying the per-request id, set when absent and echoed back.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Configuration could not be read from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Deployment name reported by `/health` (default: `development`).
    pub env: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// User id the fixed identity resolver reports as the viewer (default: `1`).
    pub viewer_id: DbId,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8080`                     |
    /// | `API_ENV`              | `development`              |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `VIEWER_ID`            | `1`                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] but reading from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "PORT", 8080)?,
            env: lookup("API_ENV").unwrap_or_else(|| "development".into()),
            cors_origins,
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?,
            viewer_id: parse_or(&lookup, "VIEWER_ID", 1)?,
        })
    }
}

impl ServerConfig {
    /// CORS policy for the configured origins.
    ///
    /// Only the methods the route table uses are allowed. Clients may send
    /// JSON bodies and read back the request id.
    pub fn cors_layer(&self) -> Result<CorsLayer, ConfigError> {
        let origins = self
            .cors_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    value: origin.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
            .allow_headers([CONTENT_TYPE])
            .expose_headers([REQUEST_ID_HEADER])
            .max_age(Duration::from_secs(3600)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Database connection configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
    pub pool: PoolSettings,
}

impl DbConfig {
    /// | Env Var                 | Default    |
    /// |-------------------------|------------|
    /// | `DATABASE_URL`          | (required) |
    /// | `DB_MAX_OPEN_CONNS`     | `30`       |
    /// | `DB_MAX_IDLE_CONNS`     | `5`        |
    /// | `DB_MAX_IDLE_TIME_SECS` | `900`      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let defaults = PoolSettings::default();

        Ok(Self {
            database_url,
            pool: PoolSettings {
                max_connections: parse_or(&lookup, "DB_MAX_OPEN_CONNS", defaults.max_connections)?,
                min_connections: parse_or(&lookup, "DB_MAX_IDLE_CONNS", defaults.min_connections)?,
                idle_timeout: Duration::from_secs(parse_or(
                    &lookup,
                    "DB_MAX_IDLE_TIME_SECS",
                    defaults.idle_timeout.as_secs(),
                )?),
            },
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
