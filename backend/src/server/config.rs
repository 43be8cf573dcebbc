//! Environment-driven server configuration.
//!
//! Every setting has a development-friendly default: without any variables
//! set the server binds `0.0.0.0:8080` and runs entirely on in-memory
//! fixtures. Setting `REDIS_URL` switches the stores to Redis; setting
//! `GEO_ENGINE_URL` switches route scoring to the external geo-engine.

use std::env;
use std::time::Duration;

use url::Url;

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default session lifetime (30 minutes).
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(1800);

/// Default geo-engine request deadline. Scoring walks a large street graph,
/// so the deadline sits in the tens of seconds rather than single digits.
pub const DEFAULT_GEO_TIMEOUT: Duration = Duration::from_secs(60);

/// A configuration variable failed to parse.
#[derive(Debug, thiserror::Error)]
#[error("invalid {name}: {message}")]
pub struct ConfigError {
    name: &'static str,
    message: String,
}

impl ConfigError {
    fn new(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            message: message.into(),
        }
    }
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface the HTTP server binds to (`HOST`).
    pub host: String,
    /// Port the HTTP server binds to (`PORT`).
    pub port: u16,
    /// Redis connection URL (`REDIS_URL`); `None` selects in-memory stores.
    pub redis_url: Option<String>,
    /// Geo-engine base URL (`GEO_ENGINE_URL`); `None` selects the fixture
    /// scorer.
    pub geo_engine_url: Option<Url>,
    /// Session lifetime (`SESSION_TTL_SECS`).
    pub session_ttl: Duration,
    /// Geo-engine request deadline (`GEO_TIMEOUT_SECS`).
    pub geo_timeout: Duration,
}

impl Config {
    /// Read configuration from process environment variables.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is present but does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = match var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|err| ConfigError::new("PORT", err.to_string()))?,
            None => DEFAULT_PORT,
        };
        let geo_engine_url = var("GEO_ENGINE_URL")
            .map(|raw| {
                Url::parse(&raw).map_err(|err| ConfigError::new("GEO_ENGINE_URL", err.to_string()))
            })
            .transpose()?;
        let session_ttl = duration_secs(var("SESSION_TTL_SECS"), "SESSION_TTL_SECS")?
            .unwrap_or(DEFAULT_SESSION_TTL);
        let geo_timeout =
            duration_secs(var("GEO_TIMEOUT_SECS"), "GEO_TIMEOUT_SECS")?.unwrap_or(DEFAULT_GEO_TIMEOUT);

        Ok(Self {
            host,
            port,
            redis_url: var("REDIS_URL"),
            geo_engine_url,
            session_ttl,
            geo_timeout,
        })
    }
}

fn duration_secs(
    raw: Option<String>,
    name: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let secs = raw
        .parse::<u64>()
        .map_err(|err| ConfigError::new(name, err.to_string()))?;
    if secs == 0 {
        return Err(ConfigError::new(name, "must be at least 1 second"));
    }
    Ok(Some(Duration::from_secs(secs)))
}
