//! Auth errors

use authgate_store::StoreError;
use thiserror::Error;

/// Token lifecycle errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Request body or form had the wrong shape
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Token is not a three-part compact token, or its claims are malformed
    #[error("malformed token")]
    MalformedToken,

    /// Wrong password
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Bad signature or unexpected algorithm
    #[error("invalid token")]
    InvalidToken,

    /// Signature is valid but the token is not the one on file
    #[error("token is no longer current")]
    TokenMismatch,

    /// Token has expired
    #[error("token expired")]
    TokenExpired,

    /// Identity not known to the store
    #[error("identity not found")]
    IdentityNotFound,

    /// Identity store unreachable or answered with garbage
    #[error("identity store unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Token could not be signed
    #[error("signing failure: {0}")]
    SigningFailure(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MalformedRequest(_) => 400,
            Self::MalformedToken
            | Self::InvalidCredentials
            | Self::InvalidToken
            | Self::TokenMismatch
            | Self::TokenExpired => 401,
            Self::IdentityNotFound => 404,
            Self::UpstreamUnavailable(_)
            | Self::SigningFailure(_)
            | Self::Configuration(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedRequest(_) => "MALFORMED_REQUEST",
            Self::MalformedToken => "MALFORMED_TOKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenMismatch => "TOKEN_MISMATCH",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::IdentityNotFound => "IDENTITY_NOT_FOUND",
            Self::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Self::SigningFailure(_) => "SIGNING_FAILURE",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether this is a server-side failure rather than a client mistake
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable(_)
                | Self::SigningFailure(_)
                | Self::Configuration(_)
                | Self::Internal(_)
        )
    }

    /// Message safe to return to clients.
    ///
    /// Internal failures get a fixed message; their detail only goes to logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::UpstreamUnavailable(_) => "identity store unavailable".to_string(),
            Self::SigningFailure(_) => "failed to create token".to_string(),
            Self::Configuration(_) | Self::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::IdentityNotFound,
            other => {
                tracing::error!(error = %other, "Identity store error");
                Self::UpstreamUnavailable(other.to_string())
            }
        }
    }
}
