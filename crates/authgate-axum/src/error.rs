//! Error types for the request gate and extractors.

use authgate_core::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Reasons a request is turned away at the gate.
///
/// Every variant answers 401.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// No `Authorization` header, or an empty one.
    #[error("authorization header required")]
    MissingCredentials,

    /// `Authorization` header is not valid UTF-8.
    #[error("authorization header is not valid text")]
    InvalidHeader,

    /// Handler asked for auth on a route the gate does not cover.
    #[error("authentication required")]
    Unauthenticated,

    /// Token failed validation.
    #[error(transparent)]
    Rejected(#[from] AuthError),
}

impl GateError {
    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "MISSING_CREDENTIALS",
            Self::InvalidHeader => "INVALID_HEADER",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Rejected(e) => e.error_code(),
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Rejected(e) => e.public_message(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        if let Self::Rejected(e) = &self {
            if e.is_internal() {
                tracing::error!(error = %e, "Token validation failed upstream");
            }
        }

        let body = serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.public_message(),
            }
        });

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}
