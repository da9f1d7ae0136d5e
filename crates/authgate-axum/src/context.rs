//! Authentication context types.
//!
//! The [`AuthContext`] struct carries the validated identity to request
//! handlers.

use authgate_core::Claims;
use chrono::{DateTime, Utc};

/// How the token was presented in the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// `Bearer <token>`, prefix matched case-insensitively.
    BearerToken,
    /// The whole header value, no scheme.
    RawHeader,
}

/// Authentication context for a request that passed the gate.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Validated claims.
    pub claims: Claims,
    /// The token exactly as presented.
    pub token: String,
    /// Where the token came from.
    pub source: AuthSource,
}

impl AuthContext {
    /// Create a context from validated claims.
    #[must_use]
    pub fn new(claims: Claims, token: impl Into<String>, source: AuthSource) -> Self {
        Self {
            claims,
            token: token.into(),
            source,
        }
    }

    /// The authenticated identity.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.claims.identity
    }

    /// The tenant id signed into the token.
    #[must_use]
    pub fn tenant_id(&self) -> i64 {
        self.claims.tenant_id
    }

    /// When the token expires.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims.expires_at()
    }
}
