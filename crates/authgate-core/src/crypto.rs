//! Cryptographic utilities for secure operations
//!
//! Signing secret handling, constant-time comparison, and the password-hash
//! comparison primitive.

use jsonwebtoken::{DecodingKey, EncodingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Process-wide symmetric signing secret.
///
/// Held in memory only. Losing it (e.g. on restart with a generated secret)
/// invalidates every outstanding token.
#[derive(Clone)]
pub struct SigningSecret {
    key_bytes: Arc<[u8]>,
}

impl SigningSecret {
    /// Minimum allowed key length in bytes (256 bits)
    pub const MIN_KEY_LENGTH: usize = 32;

    /// Generate a fresh secret: 32 random bytes from the OS, hex-encoded.
    pub fn generate() -> Self {
        let mut raw = [0u8; 32];
        OsRng.fill_bytes(&mut raw);
        Self {
            key_bytes: Arc::from(hex::encode(raw).into_bytes()),
        }
    }

    /// Create a secret from operator-supplied bytes.
    ///
    /// # Errors
    /// Returns error if key is shorter than 32 bytes.
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, SecretError> {
        let key_bytes = key.as_ref();
        if key_bytes.len() < Self::MIN_KEY_LENGTH {
            return Err(SecretError::KeyTooShort {
                actual: key_bytes.len(),
                minimum: Self::MIN_KEY_LENGTH,
            });
        }
        Ok(Self {
            key_bytes: Arc::from(key_bytes),
        })
    }

    /// Key length in bytes
    pub fn len(&self) -> usize {
        self.key_bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_bytes.is_empty()
    }

    pub(crate) fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.key_bytes)
    }

    pub(crate) fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.key_bytes)
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningSecret")
            .field("key_length", &self.key_bytes.len())
            .finish_non_exhaustive()
    }
}

/// Errors that can occur when creating a signing secret
#[derive(Debug, Clone, thiserror::Error)]
pub enum SecretError {
    #[error("signing secret too short: got {actual} bytes, need at least {minimum}")]
    KeyTooShort { actual: usize, minimum: usize },
}

/// Constant-time byte slice comparison.
///
/// Length is not treated as secret; slices of different length compare
/// unequal immediately.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

/// Compare a plaintext password against a bcrypt hash.
///
/// An unparsable hash compares as a mismatch.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Stored password hash is not a valid bcrypt hash");
        false
    })
}

/// Hash a password with bcrypt at the given cost
pub fn hash_password(plain: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plain, cost)
}

/// Short prefix of a token for log lines
pub fn token_preview(token: &str) -> &str {
    token.get(..10).unwrap_or(token)
}
