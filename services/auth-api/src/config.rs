//! Configuration for the Auth API service.

use authgate_core::{parse_algorithm, AuthConfig, SigningSecret};
use std::time::Duration;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Longest accepted token lifetime (10 years)
const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Auth API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Name sent to the identity store with every request
    pub service_name: String,

    /// HTTP server port
    pub http_port: u16,

    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,

    /// Identity store base URL
    pub identity_store_url: String,

    /// Identity store request timeout
    pub identity_store_timeout: Duration,

    /// Token core configuration
    pub auth: AuthConfig,

    /// Whether the signing secret was generated at startup
    pub secret_generated: bool,

    /// Request timeout
    pub request_timeout: Duration,

    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let service_name = var("SERVICE_NAME", "auth-service");

        // Server
        let http_port = var("HTTP_PORT", "8080")
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        let log_level = var("LOG_LEVEL", "info").to_ascii_lowercase();
        if !LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(ConfigError::Invalid("LOG_LEVEL"));
        }

        // Identity store
        let identity_store_url = var("IDENTITY_STORE_URL", "http://web:8000");
        if !identity_store_url.starts_with("http://") && !identity_store_url.starts_with("https://")
        {
            return Err(ConfigError::Invalid("IDENTITY_STORE_URL"));
        }

        let identity_store_timeout_secs: u64 = var("IDENTITY_STORE_TIMEOUT_SECS", "10")
            .parse()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::Invalid("IDENTITY_STORE_TIMEOUT_SECS"))?;

        // Tokens
        let token_ttl_secs: u64 = var("TOKEN_TTL_SECS", "604800")
            .parse()
            .ok()
            .filter(|secs| (1..=MAX_TOKEN_TTL_SECS).contains(secs))
            .ok_or(ConfigError::Invalid("TOKEN_TTL_SECS"))?;

        let algorithm = parse_algorithm(&var("TOKEN_ALGORITHM", "HS256"))
            .map_err(|_| ConfigError::Invalid("TOKEN_ALGORITHM"))?;

        // Signing secret (minimum 32 bytes), generated when absent
        let (secret, secret_generated) = match lookup("TOKEN_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => (
                SigningSecret::new(secret)
                    .map_err(|_| ConfigError::Invalid("TOKEN_SECRET must be at least 32 bytes"))?,
                false,
            ),
            None => (SigningSecret::generate(), true),
        };

        // Request timeout (default 30 seconds)
        let request_timeout_secs: u64 = var("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?;

        // Metrics
        let metrics_enabled = var("METRICS_ENABLED", "true").parse().unwrap_or(true);

        let auth = AuthConfig::new(secret)
            .with_algorithm(algorithm)
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?
            .with_token_ttl(Duration::from_secs(token_ttl_secs));

        Ok(Self {
            service_name,
            http_port,
            log_level,
            identity_store_url,
            identity_store_timeout: Duration::from_secs(identity_store_timeout_secs),
            auth,
            secret_generated,
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(String),
}
