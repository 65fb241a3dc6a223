//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MEALDASH_API_BASE_URL` - Base URL of the MealDash REST backend
//!
//! ## Optional
//! - `MEALDASH_SESSION_FILE` - Path of the durable session store. When
//!   absent the session lives in memory only and is lost on restart.

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the MealDash REST backend.
    pub api_base_url: Url,
    /// Durable session store path. `None` keeps the session in memory.
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
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

        let api_base_url = parse_base_url(&get_required_env("MEALDASH_API_BASE_URL")?)?;
        let session_file = get_optional_env("MEALDASH_SESSION_FILE").map(PathBuf::from);

        Ok(Self {
            api_base_url,
            session_file,
        })
    }

    /// Build a config directly from parts (primarily for tests).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid absolute URL.
    pub fn new(base_url: &str, session_file: Option<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_base_url(base_url)?,
            session_file,
        })
    }
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

/// Parse and validate the backend base URL.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| {
        ConfigError::InvalidEnvVar("MEALDASH_API_BASE_URL".to_string(), e.to_string())
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            "MEALDASH_API_BASE_URL".to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_valid() {
        let url = parse_base_url("https://api.mealdash.example").unwrap();
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn test_parse_base_url_rejects_relative() {
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("mailto:ops@mealdash.example").is_err());
    }

    #[test]
    fn test_new_from_parts() {
        let config = ClientConfig::new("http://localhost:5000", None).unwrap();
        assert_eq!(config.api_base_url.port(), Some(5000));
        assert!(config.session_file.is_none());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("MEALDASH_API_BASE_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: MEALDASH_API_BASE_URL"
        );
    }
}
