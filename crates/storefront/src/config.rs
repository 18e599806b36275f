//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Client (stores, CLI)
//! - `ESTORE_API_BASE_URL` - Base URL of the REST backend (required)
//! - `ESTORE_REQUEST_TIMEOUT_SECS` - Timeout applied to every backend call (default: 50)
//! - `ESTORE_DATA_DIR` - Directory for the persisted snapshot and auth cookie (default: .estore)
//! - `ESTORE_RAZORPAY_KEY_ID` - Razorpay publishable key id; enables Razorpay checkout
//! - `ESTORE_CASHFREE_APP_ID` - Cashfree app id
//!
//! ## Edge server
//! - `ESTORE_EDGE_HOST` - Bind address (default: 127.0.0.1)
//! - `ESTORE_EDGE_PORT` - Listen port (default: 3000)
//! - `ESTORE_STATIC_DIR` - Built storefront pages served behind the guard (default: public)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_TRACES_SAMPLE_RATE` - Fraction of requests traced (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default request timeout, applied uniformly to all backend calls.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 50;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Configuration for the client-side stores and REST client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    pub api_base_url: Url,
    /// Timeout for a single request
    pub request_timeout: Duration,
    /// Where persisted state lives
    pub data_dir: PathBuf,
    /// Payment gateway configuration
    pub payments: PaymentConfig,
}

/// Payment gateway keys. Both are publishable identifiers, not secrets.
#[derive(Debug, Clone, Default)]
pub struct PaymentConfig {
    /// Razorpay key id handed to the checkout widget
    pub razorpay_key_id: Option<String>,
    /// Cashfree app id
    pub cashfree_app_id: Option<String>,
}

/// Edge server configuration.
#[derive(Debug, Clone)]
pub struct EdgeConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory of built storefront pages
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry performance tracing sample rate
    pub sentry_traces_sample_rate: f32,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL is missing or any value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_base_url(&get_required_env("ESTORE_API_BASE_URL")?)?;
        let timeout_secs = get_env_or_default(
            "ESTORE_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("ESTORE_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        let data_dir = PathBuf::from(get_env_or_default("ESTORE_DATA_DIR", ".estore"));

        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            data_dir,
            payments: PaymentConfig::from_env(),
        })
    }

    /// Build a configuration for the given backend with defaults everywhere else.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not an http(s) URL.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_base_url(base_url)?,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            data_dir: PathBuf::from(".estore"),
            payments: PaymentConfig::default(),
        })
    }
}

impl PaymentConfig {
    fn from_env() -> Self {
        Self {
            razorpay_key_id: get_optional_env("ESTORE_RAZORPAY_KEY_ID"),
            cashfree_app_id: get_optional_env("ESTORE_CASHFREE_APP_ID"),
        }
    }
}

impl EdgeConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ESTORE_EDGE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ESTORE_EDGE_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("ESTORE_EDGE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ESTORE_EDGE_PORT".to_string(), e.to_string())
            })?;
        let sentry_traces_sample_rate = get_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_TRACES_SAMPLE_RATE".to_string(), e.to_string())
            })?;

        Ok(Self {
            host,
            port,
            static_dir: PathBuf::from(get_env_or_default("ESTORE_STATIC_DIR", "public")),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and normalize the backend base URL (no trailing slash).
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("ESTORE_API_BASE_URL".to_string(), reason);

    let url = Url::parse(raw.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_accepts_http() {
        let url = parse_base_url("https://api.example.com/v1/").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1");
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        assert!(matches!(
            parse_base_url("ftp://example.com"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_for_base_url_defaults() {
        let config = ClientConfig::for_base_url("http://localhost:5000").unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(50));
        assert!(config.payments.razorpay_key_id.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let config = EdgeConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            static_dir: PathBuf::from("public"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
