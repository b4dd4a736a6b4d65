//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `APPWRITE_PROJECT_ID` - Project ID sent with every identity service request
//!
//! ## Optional
//! - `APPWRITE_ENDPOINT` - Identity service base URL (default: <https://cloud.appwrite.io/v1>)
//! - `KABADIWALA_STORAGE_PATH` - JSON file for persisted state (default: in-memory only)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (e.g. production, staging)
//! - `KABADIWALA_LOG_FORMAT` - `text` (default) or `json`

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_APPWRITE_ENDPOINT: &str = "https://cloud.appwrite.io/v1";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Identity service configuration
    pub identity: IdentityServiceConfig,
    /// Where persisted state lives; `None` keeps everything in memory
    pub storage_path: Option<PathBuf>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Log line format
    pub log_format: LogFormat,
}

/// Output format for the `fmt` tracing layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Identity service (Appwrite-compatible) configuration.
#[derive(Debug, Clone)]
pub struct IdentityServiceConfig {
    /// API base URL, including the version path (e.g. `.../v1`)
    pub endpoint: Url,
    /// Project ID
    pub project_id: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let identity = IdentityServiceConfig {
            endpoint: parse_endpoint(
                "APPWRITE_ENDPOINT",
                &vars.or_default("APPWRITE_ENDPOINT", DEFAULT_APPWRITE_ENDPOINT),
            )?,
            project_id: vars.required("APPWRITE_PROJECT_ID")?,
        };

        Ok(Self {
            identity,
            storage_path: vars.optional("KABADIWALA_STORAGE_PATH").map(PathBuf::from),
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
            log_format: parse_log_format(vars.optional("KABADIWALA_LOG_FORMAT").as_deref())?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Vars<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    /// Get a variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Parse the identity endpoint, which must be an absolute http(s) URL.
fn parse_endpoint(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}

fn parse_log_format(value: Option<&str>) -> Result<LogFormat, ConfigError> {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("text") => Ok(LogFormat::Text),
        Some("json") => Ok(LogFormat::Json),
        Some(other) => Err(ConfigError::InvalidEnvVar(
            "KABADIWALA_LOG_FORMAT".to_string(),
            format!("expected 'text' or 'json', got '{other}'"),
        )),
    }
}
