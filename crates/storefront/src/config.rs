//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CATALOG_API_URL` - Base URL of the product/stock service (default: <http://localhost:3333>)
//! - `CATALOG_API_TOKEN` - Bearer token sent to the catalog service
//! - `CATALOG_CACHE_TTL_SECS` - Product cache lifetime in seconds (default: 300)
//! - `CART_STORAGE_DIR` - Directory holding the persisted cart (default: `.rocketshoes`)
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_API_URL: &str = "http://localhost:3333";
const DEFAULT_CACHE_TTL_SECS: &str = "300";
const DEFAULT_STORAGE_DIR: &str = ".rocketshoes";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),

    #[error("Invalid catalog URL {0}: {1}")]
    InvalidCatalogUrl(Url, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Catalog service configuration
    pub catalog: CatalogConfig,
    /// Directory for the file-backed cart slot
    pub storage_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g., production, staging)
    pub sentry_environment: Option<String>,
}

/// Remote catalog service configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Base URL; product and stock paths are joined onto it
    pub base_url: Url,
    /// Optional bearer token
    pub api_token: Option<SecretString>,
    /// How long fetched products stay cached
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let host = vars
            .get_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = vars
            .get_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        let catalog = CatalogConfig::from_vars(&vars)?;
        let storage_dir = PathBuf::from(vars.get_or_default("CART_STORAGE_DIR", DEFAULT_STORAGE_DIR));

        Ok(Self {
            host,
            port,
            catalog,
            storage_dir,
            sentry_dsn: vars.get("SENTRY_DSN"),
            sentry_environment: vars.get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    /// Catalog configuration pointing at `base_url` with no token and the
    /// default cache lifetime.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_token: None,
            cache_ttl: Duration::from_secs(300),
        }
    }

    /// Point the catalog at another service.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidCatalogUrl` unless `base_url` is an
    /// absolute http(s) URL; the current URL is kept in that case.
    pub fn set_base_url(&mut self, base_url: Url) -> Result<(), ConfigError> {
        check_base_url(&base_url)
            .map_err(|reason| ConfigError::InvalidCatalogUrl(base_url.clone(), reason))?;
        self.base_url = base_url;
        Ok(())
    }

    fn from_vars(vars: &Vars<'_>) -> Result<Self, ConfigError> {
        let raw_url = vars.get_or_default("CATALOG_API_URL", DEFAULT_CATALOG_API_URL);
        let base_url = Url::parse(&raw_url)
            .map_err(|e| e.to_string())
            .and_then(|url| check_base_url(&url).map(|()| url))
            .map_err(|reason| ConfigError::InvalidEnvVar("CATALOG_API_URL".to_string(), reason))?;

        let cache_ttl_secs = vars
            .get_or_default("CATALOG_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CATALOG_CACHE_TTL_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            base_url,
            api_token: vars.get("CATALOG_API_TOKEN").map(SecretString::from),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Catalog paths are joined onto the base URL, so it must be hierarchical.
fn check_base_url(url: &Url) -> Result<(), String> {
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err("must be an absolute http(s) URL".to_string());
    }
    Ok(())
}

/// Variable lookup used while loading; empty values count as unset.
struct Vars<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    /// Get an optional variable.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}
