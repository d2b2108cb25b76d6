//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `REGPOINT_DATABASE_URL` - `SQLite` URL backing the session store
//! - `REGISTRY_API_URL` - Base URL of the registry REST service
//! - `AUTH_URL` - Hosted auth provider base URL
//! - `AUTH_API_KEY` - Auth provider API key
//! - `STORAGE_URL` - Storage project base URL (slide media uploads)
//! - `STORAGE_KEY` - Storage project service key
//! - `PAYMENT_PUBLIC_KEY` - Payment provider public key
//! - `ADMIN_EMAIL` - The single allow-listed administrative identity
//!
//! ## Optional
//! - `REGPOINT_HOST` - Bind address (default: 127.0.0.1)
//! - `REGPOINT_PORT` - Listen port (default: 3000)
//! - `REGPOINT_BASE_URL` - Public origin (default: derived from host/port)
//! - `CONTACT_PHONE` - WhatsApp number for the payment-receipt hand-off link
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};

use regpoint_core::Email;
use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
///
/// Missing or invalid variables fail startup with a clear diagnostic;
/// nothing silently falls back to a placeholder endpoint.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Application configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct RegPointConfig {
    /// `SQLite` URL for the durable session store
    pub database_url: String,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Base URL of the registry REST service
    pub registry_api_url: String,
    /// Hosted auth provider base URL
    pub auth_url: String,
    /// Auth provider API key
    pub auth_api_key: SecretString,
    /// Storage project base URL
    pub storage_url: String,
    /// Storage project service key
    pub storage_key: SecretString,
    /// Payment provider public key
    pub payment_public_key: String,
    /// The single allow-listed administrative identity
    pub admin_email: Email,
    /// WhatsApp number for the receipt hand-off link
    pub contact_phone: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for RegPointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegPointConfig")
            .field("database_url", &self.database_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("registry_api_url", &self.registry_api_url)
            .field("auth_url", &self.auth_url)
            .field("auth_api_key", &"[REDACTED]")
            .field("storage_url", &self.storage_url)
            .field("storage_key", &"[REDACTED]")
            .field("payment_public_key", &self.payment_public_key)
            .field("admin_email", &self.admin_email)
            .field("contact_phone", &self.contact_phone)
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl RegPointConfig {
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

        let database_url = get_required_env("REGPOINT_DATABASE_URL")?;
        let host = get_env_or_default("REGPOINT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("REGPOINT_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("REGPOINT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("REGPOINT_PORT".to_string(), e.to_string()))?;
        let base_url = match get_optional_env("REGPOINT_BASE_URL") {
            Some(url) => validate_url("REGPOINT_BASE_URL", url)?,
            None => format!("http://{host}:{port}"),
        };

        let registry_api_url =
            validate_url("REGISTRY_API_URL", get_required_env("REGISTRY_API_URL")?)?;
        let auth_url = validate_url("AUTH_URL", get_required_env("AUTH_URL")?)?;
        let auth_api_key = get_required_secret("AUTH_API_KEY")?;
        let storage_url = validate_url("STORAGE_URL", get_required_env("STORAGE_URL")?)?;
        let storage_key = get_required_secret("STORAGE_KEY")?;
        let payment_public_key = get_required_env("PAYMENT_PUBLIC_KEY")?;

        let admin_email = Email::parse(&get_required_env("ADMIN_EMAIL")?)
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_EMAIL".to_string(), e.to_string()))?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            registry_api_url,
            auth_url,
            auth_api_key,
            storage_url,
            storage_key,
            payment_public_key,
            admin_email,
            contact_phone: get_optional_env("CONTACT_PHONE"),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
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

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a value parses as an absolute URL, returning it with any
/// trailing slash trimmed so path joins stay predictable.
fn validate_url(key: &str, value: String) -> Result<String, ConfigError> {
    url::Url::parse(&value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(value.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> RegPointConfig {
        RegPointConfig {
            database_url: "sqlite://regpoint.db?mode=rwc".to_string(),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            registry_api_url: "https://api.example.com".to_string(),
            auth_url: "https://auth.example.com".to_string(),
            auth_api_key: SecretString::from("auth_key_value"),
            storage_url: "https://storage.example.com".to_string(),
            storage_key: SecretString::from("storage_key_value"),
            payment_public_key: "pk_test_abc".to_string(),
            admin_email: Email::parse("admin@regpoint.ng").unwrap(),
            contact_phone: Some("2348000000000".to_string()),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_validate_url_trims_trailing_slash() {
        let url = validate_url("TEST", "https://api.example.com/".to_string()).unwrap();
        assert_eq!(url, "https://api.example.com");
    }

    #[test]
    fn test_validate_url_rejects_garbage() {
        assert!(validate_url("TEST", "not a url".to_string()).is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = test_config();
        let debug_output = format!("{config:?}");

        // Public fields should be visible
        assert!(debug_output.contains("https://api.example.com"));
        assert!(debug_output.contains("pk_test_abc"));
        assert!(debug_output.contains("admin@regpoint.ng"));

        // Secret fields should be redacted
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("auth_key_value"));
        assert!(!debug_output.contains("storage_key_value"));
    }
}
