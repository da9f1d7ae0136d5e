//! Configuration types for the token service

use jsonwebtoken::Algorithm;
use std::time::Duration;

use crate::crypto::SigningSecret;
use crate::AuthError;

/// Token service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Symmetric signing secret
    pub secret: SigningSecret,
    /// Declared signing algorithm (HMAC family only)
    pub algorithm: Algorithm,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
}

impl AuthConfig {
    /// Default token lifetime (7 days)
    pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    /// Create a config with HS256 and the default lifetime
    pub fn new(secret: SigningSecret) -> Self {
        Self {
            secret,
            algorithm: Algorithm::HS256,
            token_ttl: Self::DEFAULT_TOKEN_TTL,
        }
    }

    /// Create a config with a freshly generated secret
    pub fn generated() -> Self {
        Self::new(SigningSecret::generate())
    }

    /// Set the signing algorithm.
    ///
    /// # Errors
    /// Returns `Configuration` for non-HMAC algorithms.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Result<Self, AuthError> {
        if !is_hmac(algorithm) {
            return Err(AuthError::Configuration(format!(
                "unsupported signing algorithm {algorithm:?}, expected HS256, HS384 or HS512"
            )));
        }
        self.algorithm = algorithm;
        Ok(self)
    }

    /// Set token lifetime
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }
}

/// Parse an algorithm name such as `HS256`
pub fn parse_algorithm(name: &str) -> Result<Algorithm, AuthError> {
    let algorithm: Algorithm = name
        .trim()
        .parse()
        .map_err(|_| AuthError::Configuration(format!("unknown signing algorithm: {name}")))?;
    if !is_hmac(algorithm) {
        return Err(AuthError::Configuration(format!(
            "unsupported signing algorithm: {name}"
        )));
    }
    Ok(algorithm)
}

fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}
