//! Axum extractors for authentication.
//!
//! These read the [`AuthContext`] the gate stored in request extensions.
//!
//! # Usage
//!
//! ```ignore
//! use authgate_axum::RequireAuth;
//!
//! // 401 if the gate did not authenticate the request
//! async fn protected(auth: RequireAuth) -> String {
//!     format!("Hello, {}!", auth.identity())
//! }
//! ```

use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::context::AuthContext;
use crate::error::GateError;

/// Extension key for storing auth context in request extensions.
#[derive(Debug, Clone)]
pub struct AuthContextExt(pub AuthContext);

/// Extractor that requires authentication.
///
/// Returns 401 Unauthorized if the gate did not run for this request.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthContext);

impl Deref for RequireAuth {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContextExt>()
            .cloned()
            .map(|ext| Self(ext.0))
            .ok_or(GateError::Unauthenticated)
    }
}
