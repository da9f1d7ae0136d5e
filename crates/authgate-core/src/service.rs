//! Token lifecycle service - ties together signing, password checks and the identity store

use authgate_store::{IdentityStore, UserRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    claims::Claims,
    config::AuthConfig,
    crypto::{constant_time_eq, token_preview, verify_password},
    signer::TokenSigner,
    AuthError,
};

/// Login credentials. Never logged or stored.
#[derive(Clone)]
pub struct Credentials {
    pub identity: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// A token handed back to the client
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
}

/// Where a token was minted, used as a metrics label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IssuePath {
    Login,
    Refresh,
}

impl IssuePath {
    fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Refresh => "refresh",
        }
    }
}

/// Token lifecycle service
///
/// Holds no per-user state. The identity store is the single source of
/// truth for which token is current, so every validation costs one store
/// round trip.
pub struct TokenService<S: IdentityStore> {
    signer: TokenSigner,
    store: Arc<S>,
}

impl<S: IdentityStore> TokenService<S> {
    /// Create a new token service
    pub fn new(config: AuthConfig, store: Arc<S>) -> Self {
        Self {
            signer: TokenSigner::new(&config),
            store,
        }
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    // =========================================================================
    // Issue
    // =========================================================================

    /// Check credentials and issue a new current token for the identity
    pub async fn login(&self, credentials: &Credentials) -> Result<IssuedToken, AuthError> {
        if credentials.identity.is_empty() || credentials.secret.is_empty() {
            return Err(AuthError::MalformedRequest(
                "username and password are required".to_string(),
            ));
        }

        let user = self.find_user(&credentials.identity).await?;

        let secret = credentials.secret.clone();
        let hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&secret, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("password check aborted: {e}")))?;

        if !matches {
            tracing::info!(identity = %credentials.identity, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_for(&user.identity, user.tenant_id, IssuePath::Login)
            .await
    }

    // =========================================================================
    // Validate
    // =========================================================================

    /// Validate a presented token against the signature and the store
    pub async fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_at(token, Utc::now()).await
    }

    /// Validate a presented token as if the current time were `now`
    pub async fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let result = self.check_token(token, now).await;
        if let Err(ref e) = result {
            metrics::counter!("authgate_validation_failures_total", "reason" => e.error_code())
                .increment(1);
        }
        result
    }

    async fn check_token(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let claims = self.signer.verify_at(token, now)?;
        let user = self.find_user(&claims.identity).await?;

        // An empty stored token means logged out and never matches.
        if user.current_token.is_empty()
            || !constant_time_eq(token.as_bytes(), user.current_token.as_bytes())
        {
            tracing::info!(
                identity = %claims.identity,
                token = token_preview(token),
                "Token is not the one on file"
            );
            return Err(AuthError::TokenMismatch);
        }

        Ok(claims)
    }

    // =========================================================================
    // Refresh / Revoke
    // =========================================================================

    /// Issue a replacement for a validated token, superseding it
    pub async fn refresh(&self, claims: &Claims) -> Result<IssuedToken, AuthError> {
        self.issue_for(&claims.identity, claims.tenant_id, IssuePath::Refresh)
            .await
    }

    /// Clear a validated token from the store
    pub async fn revoke(&self, claims: &Claims, token: &str) -> Result<(), AuthError> {
        self.store
            .clear_token(&claims.identity, token)
            .await
            .map_err(|e| {
                tracing::error!(identity = %claims.identity, error = %e, "Failed to clear token");
                AuthError::UpstreamUnavailable(e.to_string())
            })?;

        metrics::counter!("authgate_tokens_revoked_total").increment(1);
        tracing::info!(
            identity = %claims.identity,
            token = token_preview(token),
            "Token revoked"
        );
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn find_user(&self, identity: &str) -> Result<UserRecord, AuthError> {
        self.store.find_user(identity).await?.ok_or_else(|| {
            tracing::info!(identity = %identity, "Identity not found");
            AuthError::IdentityNotFound
        })
    }

    async fn issue_for(
        &self,
        identity: &str,
        tenant_id: i64,
        path: IssuePath,
    ) -> Result<IssuedToken, AuthError> {
        let signed = self
            .signer
            .issue(identity, tenant_id, self.signer.token_ttl())?;

        // A token that never reaches the store is never current, so it is dropped.
        self.store
            .update_token(identity, &signed.token)
            .await
            .map_err(|e| {
                tracing::error!(identity = %identity, error = %e, "Failed to store issued token");
                AuthError::UpstreamUnavailable(e.to_string())
            })?;

        metrics::counter!("authgate_tokens_issued_total", "path" => path.as_str()).increment(1);
        tracing::info!(
            identity = %identity,
            tenant_id,
            path = path.as_str(),
            token = token_preview(&signed.token),
            "Token issued"
        );

        let expires_at = signed
            .claims
            .expires_at()
            .ok_or_else(|| AuthError::SigningFailure("expiry out of range".to_string()))?;

        Ok(IssuedToken {
            access_token: signed.token,
            token_type: "bearer",
            expires_at,
        })
    }
}
