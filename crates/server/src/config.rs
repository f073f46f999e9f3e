//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `APPS_SCRIPT_URL` - Upstream feed endpoint (Google Apps Script webapp).
//!   This is a capability URL: whoever holds it can read the sales data, so
//!   it is kept in a `SecretString` and redacted from `Debug` output.
//!
//! ## Optional
//! - `REVALIDATE_SECONDS` - Feed cache TTL and HTTP revalidation interval
//!   (default: 300)
//! - `FERIA_HOST` - Bind address (default: 127.0.0.1)
//! - `FERIA_PORT` - Listen port (default: 3002)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sampling (0.0-1.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Default feed cache TTL / revalidation interval, in seconds.
const DEFAULT_REVALIDATE_SECONDS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Upstream feed configuration
    pub feed: FeedConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Upstream feed configuration.
///
/// Implements `Debug` manually to redact the capability URL.
#[derive(Clone)]
pub struct FeedConfig {
    /// Feed endpoint URL (grants read access to the sales data)
    pub url: SecretString,
    /// Cache TTL; also advertised to HTTP clients via `Cache-Control`
    pub revalidate: Duration,
}

impl std::fmt::Debug for FeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedConfig")
            .field("url", &"[REDACTED]")
            .field("revalidate", &self.revalidate)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `APPS_SCRIPT_URL` is missing or any value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_var("FERIA_HOST", get_env_or_default("FERIA_HOST", "127.0.0.1"))?;
        let port = parse_env_var("FERIA_PORT", get_env_or_default("FERIA_PORT", "3002"))?;
        let feed = FeedConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            feed,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl FeedConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = get_required_env("APPS_SCRIPT_URL")?;
        let revalidate = parse_revalidate(&get_env_or_default(
            "REVALIDATE_SECONDS",
            &DEFAULT_REVALIDATE_SECONDS.to_string(),
        ))
        .map_err(|e| ConfigError::InvalidEnvVar("REVALIDATE_SECONDS".to_string(), e))?;

        Ok(Self {
            url: SecretString::from(url),
            revalidate,
        })
    }
}

/// Parse a revalidation interval in seconds.
///
/// Zero is rejected: a zero TTL would hammer the upstream on every request.
fn parse_revalidate(raw: &str) -> Result<Duration, String> {
    let seconds: u64 = raw.trim().parse().map_err(|_| format!("not a number: {raw}"))?;
    if seconds == 0 {
        return Err("must be greater than zero".to_string());
    }
    Ok(Duration::from_secs(seconds))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a string value, attributing failures to the named variable.
fn parse_env_var<T>(key: &str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_parse_revalidate_valid() {
        assert_eq!(parse_revalidate("300"), Ok(Duration::from_secs(300)));
        assert_eq!(parse_revalidate(" 60 "), Ok(Duration::from_secs(60)));
    }

    #[test]
    fn test_parse_revalidate_rejects_zero_and_garbage() {
        assert!(parse_revalidate("0").is_err());
        assert!(parse_revalidate("five minutes").is_err());
        assert!(parse_revalidate("-10").is_err());
    }

    #[test]
    fn test_parse_env_var_reports_variable_name() {
        let result: Result<u16, ConfigError> = parse_env_var("FERIA_PORT", "not-a-port".to_string());
        let err = result.expect_err("invalid port");
        assert!(err.to_string().contains("FERIA_PORT"));
    }

    #[test]
    fn test_feed_config_debug_redacts_url() {
        let config = FeedConfig {
            url: SecretString::from("https://script.google.com/macros/s/SECRET-DEPLOY-ID/exec"),
            revalidate: Duration::from_secs(300),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("SECRET-DEPLOY-ID"));
        // Sanity: the secret is still reachable on purpose.
        assert!(config.url.expose_secret().contains("SECRET-DEPLOY-ID"));
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".parse().expect("valid ip"),
            port: 3002,
            feed: FeedConfig {
                url: SecretString::from("https://example.com/feed"),
                revalidate: Duration::from_secs(300),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3002);
    }
}
