//! Token signing and verification
//!
//! Verification is pure and never touches the network. Checks run in a fixed
//! order so each rejection maps to one error:
//!
//! 1. shape (three non-empty segments)
//! 2. header decoding
//! 3. algorithm pinning, before the signature is looked at
//! 4. signature
//! 5. claims decoding and structure
//! 6. expiry, valid strictly before `exp`

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;

use crate::claims::Claims;
use crate::config::AuthConfig;
use crate::crypto::token_preview;
use crate::AuthError;

/// A freshly signed token together with the claims inside it
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub claims: Claims,
}

/// Signs and verifies tokens with the process secret.
///
/// Immutable once built; share through `Arc`.
#[derive(Clone)]
pub struct TokenSigner {
    algorithm: Algorithm,
    token_ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(config.algorithm);
        // Expiry is checked by hand so that `now == exp` is already expired.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            algorithm: config.algorithm,
            token_ttl: config.token_ttl,
            encoding_key: config.secret.encoding_key(),
            decoding_key: config.secret.decoding_key(),
            validation,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Configured lifetime of issued tokens
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Sign a token for `identity` valid for `ttl` from now
    pub fn issue(
        &self,
        identity: &str,
        tenant_id: i64,
        ttl: Duration,
    ) -> Result<SignedToken, AuthError> {
        self.issue_at(identity, tenant_id, ttl, Utc::now())
    }

    /// Sign a token as if the current time were `now`
    pub fn issue_at(
        &self,
        identity: &str,
        tenant_id: i64,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<SignedToken, AuthError> {
        if identity.is_empty() {
            return Err(AuthError::SigningFailure("empty identity".to_string()));
        }
        if tenant_id < 0 {
            return Err(AuthError::SigningFailure(format!(
                "negative tenant id {tenant_id}"
            )));
        }
        if ttl.as_secs() == 0 {
            return Err(AuthError::SigningFailure(
                "token lifetime must be at least one second".to_string(),
            ));
        }

        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AuthError::SigningFailure("token lifetime out of range".to_string()))?;

        let claims = Claims::new(identity, tenant_id, now, expires_at);
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::SigningFailure(e.to_string()))?;

        tracing::debug!(
            identity = %identity,
            tenant_id,
            exp = claims.exp,
            token = token_preview(&token),
            "Signed token"
        );

        Ok(SignedToken { token, claims })
    }

    /// Verify a token against the current time
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        if !has_compact_shape(token) {
            tracing::debug!("Token is not a three-part compact token");
            return Err(AuthError::MalformedToken);
        }

        let header = decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "Failed to decode token header");
            AuthError::MalformedToken
        })?;

        if header.alg != self.algorithm {
            tracing::debug!(
                expected = ?self.algorithm,
                got = ?header.alg,
                "Token algorithm mismatch"
            );
            return Err(AuthError::InvalidToken);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                match e.kind() {
                    ErrorKind::Json(_)
                    | ErrorKind::Base64(_)
                    | ErrorKind::Utf8(_)
                    | ErrorKind::MissingRequiredClaim(_)
                    | ErrorKind::InvalidToken => AuthError::MalformedToken,
                    _ => AuthError::InvalidToken,
                }
            })?
            .claims;

        if claims.identity.is_empty() || claims.tenant_id < 0 {
            tracing::debug!(identity = %claims.identity, tenant_id = claims.tenant_id, "Malformed claims");
            return Err(AuthError::MalformedToken);
        }

        if claims.is_expired_at(now) {
            tracing::debug!(identity = %claims.identity, exp = claims.exp, "Token expired");
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("algorithm", &self.algorithm)
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

fn has_compact_shape(token: &str) -> bool {
    let mut segments = 0;
    for segment in token.split('.') {
        if segment.is_empty() {
            return false;
        }
        segments += 1;
    }
    segments == 3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SigningSecret;

    fn signer() -> TokenSigner {
        TokenSigner::new(&AuthConfig::generated())
    }

    #[test]
    fn test_issue_then_verify() {
        let signer = signer();
        let signed = signer.issue("alice", 7, Duration::from_secs(60)).unwrap();

        let claims = signer.verify(&signed.token).unwrap();
        assert_eq!(claims.identity, "alice");
        assert_eq!(claims.tenant_id, 7);
        assert_eq!(claims.exp - claims.iat, 60);
        assert_eq!(claims, signed.claims);
    }

    #[test]
    fn test_expiry_is_exclusive() {
        let signer = signer();
        let now = Utc::now();
        let signed = signer
            .issue_at("alice", 7, Duration::from_secs(60), now)
            .unwrap();
        let exp = signed.claims.expires_at().unwrap();

        assert!(signer
            .verify_at(&signed.token, exp - chrono::Duration::seconds(1))
            .is_ok());
        assert!(matches!(
            signer.verify_at(&signed.token, exp),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_other_secret_rejected() {
        let signed = signer().issue("alice", 7, Duration::from_secs(60)).unwrap();
        assert!(matches!(
            signer().verify(&signed.token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let secret = SigningSecret::generate();
        let hs256 = TokenSigner::new(&AuthConfig::new(secret.clone()));
        let hs512 = TokenSigner::new(
            &AuthConfig::new(secret)
                .with_algorithm(Algorithm::HS512)
                .unwrap(),
        );

        let signed = hs512.issue("alice", 7, Duration::from_secs(60)).unwrap();
        assert!(matches!(
            hs256.verify(&signed.token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_malformed_shapes() {
        let signer = signer();
        for token in ["", "abc", "a.b", "a..c", "a.b.c.d", ".b.c", "a.b."] {
            assert!(
                matches!(signer.verify(token), Err(AuthError::MalformedToken)),
                "{token:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_undecodable_header_is_malformed() {
        assert!(matches!(
            signer().verify("!!!.e30.sig"),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn test_issue_rejects_bad_input() {
        let signer = signer();
        let ttl = Duration::from_secs(60);
        assert!(matches!(
            signer.issue("", 7, ttl),
            Err(AuthError::SigningFailure(_))
        ));
        assert!(matches!(
            signer.issue("alice", -1, ttl),
            Err(AuthError::SigningFailure(_))
        ));
        assert!(matches!(
            signer.issue("alice", 7, Duration::ZERO),
            Err(AuthError::SigningFailure(_))
        ));
        assert!(matches!(
            signer.issue("alice", 7, Duration::MAX),
            Err(AuthError::SigningFailure(_))
        ));
    }

    #[test]
    fn test_tokens_in_same_second_differ() {
        let signer = signer();
        let now = Utc::now();
        let ttl = Duration::from_secs(60);
        let a = signer.issue_at("alice", 7, ttl, now).unwrap();
        let b = signer.issue_at("alice", 7, ttl, now).unwrap();
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_debug_hides_keys() {
        let debug = format!("{:?}", signer());
        assert!(debug.contains("HS256"));
        assert!(!debug.contains("key"));
    }
}
