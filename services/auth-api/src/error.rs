//! Error types for the Auth API service.

use authgate_core::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body or form could not be parsed
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Token lifecycle failure with the usual status mapping
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Token lifecycle failure on an endpoint whose existing clients expect
    /// 400 for store and signing failures
    #[error(transparent)]
    Compat(AuthError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Compat(e) if e.is_internal() => StatusCode::BAD_REQUEST,
            // Unknown identities are an authentication failure at the edge.
            Self::Auth(AuthError::IdentityNotFound) | Self::Compat(AuthError::IdentityNotFound) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Auth(e) | Self::Compat(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "MALFORMED_REQUEST",
            Self::Auth(e) | Self::Compat(e) => e.error_code(),
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::BadRequest(message) => message.clone(),
            Self::Auth(e) | Self::Compat(e) => e.public_message(),
        }
    }

    fn is_internal(&self) -> bool {
        match self {
            Self::BadRequest(_) => false,
            Self::Auth(e) | Self::Compat(e) => e.is_internal(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal errors
        if self.is_internal() {
            tracing::error!(error = %self, status = status.as_u16(), "Internal API error");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.public_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
