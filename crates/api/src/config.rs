//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FIREBASE_PROJECT_ID` - Firebase project the documents live in
//! - `FIREBASE_WEB_API_KEY` - Identity Toolkit web API key
//!
//! ## Optional
//! - `API_HOST` - Bind address (default: 127.0.0.1)
//! - `API_PORT` - Listen port (default: 3000)
//! - `FIRESTORE_ACCESS_TOKEN` - OAuth bearer token for Firestore requests
//!   (not needed against the emulator or open security rules)
//! - `FIREBASE_AUTH_EMULATOR_HOST` - Auth emulator host:port (e.g., 127.0.0.1:9099)
//! - `FIRESTORE_EMULATOR_HOST` - Firestore emulator host:port (e.g., 127.0.0.1:8080)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag (default: development)
//! - `SENTRY_SAMPLE_RATE` - Error sample rate 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Firebase project and credential configuration
    pub firebase: FirebaseConfig,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Firebase project configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct FirebaseConfig {
    /// Firebase project ID (e.g., guava-market-prod)
    pub project_id: String,
    /// Identity Toolkit web API key
    pub web_api_key: SecretString,
    /// OAuth bearer token for Firestore requests, if the database
    /// is not open to unauthenticated access
    pub firestore_token: Option<SecretString>,
    /// Auth emulator host:port, routes token verification to the emulator
    pub auth_emulator_host: Option<String>,
    /// Firestore emulator host:port, routes document requests to the emulator
    pub firestore_emulator_host: Option<String>,
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("project_id", &self.project_id)
            .field("web_api_key", &"[REDACTED]")
            .field(
                "firestore_token",
                &self.firestore_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("auth_emulator_host", &self.auth_emulator_host)
            .field("firestore_emulator_host", &self.firestore_emulator_host)
            .finish()
    }
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    /// Sentry DSN; tracking is disabled when unset
    pub dsn: Option<String>,
    /// Environment tag attached to events
    pub environment: String,
    /// Fraction of error events to send (0.0-1.0)
    pub sample_rate: f32,
    /// Fraction of transactions to send (0.0-1.0)
    pub traces_sample_rate: f32,
}

impl ApiConfig {
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

        let host = get_env_or_default("API_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("API_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_PORT".to_string(), e.to_string()))?;

        let firebase = FirebaseConfig::from_env()?;
        let sentry = SentryConfig::from_env()?;

        Ok(Self {
            host,
            port,
            firebase,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl FirebaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            project_id: get_required_env("FIREBASE_PROJECT_ID")?,
            web_api_key: get_required_secret("FIREBASE_WEB_API_KEY")?,
            firestore_token: get_optional_secret("FIRESTORE_ACCESS_TOKEN"),
            auth_emulator_host: get_optional_env("FIREBASE_AUTH_EMULATOR_HOST"),
            firestore_emulator_host: get_optional_env("FIRESTORE_EMULATOR_HOST"),
        })
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_env_or_default("SENTRY_ENVIRONMENT", "development"),
            sample_rate: get_rate_or_default("SENTRY_SAMPLE_RATE", 1.0)?,
            traces_sample_rate: get_rate_or_default("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
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

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an optional environment variable as a secret.
fn get_optional_secret(key: &str) -> Option<SecretString> {
    get_optional_env(key).map(SecretString::from)
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a sample rate (0.0-1.0) with a default value.
fn get_rate_or_default(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}
