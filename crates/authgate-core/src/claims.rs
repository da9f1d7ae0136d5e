//! Claims carried inside a signed token

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims signed into every token.
///
/// Claim names on the wire are `sub` (identity), `ngy` (tenant id), `iat`,
/// `exp` and `jti`. Timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity the token was issued to
    #[serde(rename = "sub")]
    pub identity: String,
    /// Tenant ("agency") id
    #[serde(rename = "ngy")]
    pub tenant_id: i64,
    /// Issued at
    pub iat: i64,
    /// Expires at
    pub exp: i64,
    /// Unique token id, keeps two tokens minted in the same second distinct
    #[serde(default)]
    pub jti: String,
}

impl Claims {
    pub(crate) fn new(
        identity: impl Into<String>,
        tenant_id: i64,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            identity: identity.into(),
            tenant_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Structural validity: non-empty identity, non-negative tenant, `exp > iat`
    pub fn is_well_formed(&self) -> bool {
        !self.identity.is_empty() && self.tenant_id >= 0 && self.exp > self.iat
    }

    /// Whether the token is expired at `now`. A token is valid strictly before `exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
