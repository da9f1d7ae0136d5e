//! Identity store record types

use serde::{Deserialize, Serialize};

/// User record as held by the identity store.
///
/// Field names on the wire follow the store's API (`login`, `password`,
/// `agency_id`, `jwt_token`). Missing fields decode to their empty value, so a
/// store that answers with an empty object yields a record with an empty
/// identity, which callers treat as "not found".
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserRecord {
    /// Login name
    #[serde(rename = "login", default)]
    pub identity: String,
    /// bcrypt hash of the user's password
    #[serde(rename = "password", default)]
    pub password_hash: String,
    /// Tenant ("agency") the identity belongs to
    #[serde(rename = "agency_id", default)]
    pub tenant_id: i64,
    /// Token currently on file, empty when logged out
    #[serde(rename = "jwt_token", default)]
    pub current_token: String,
}

impl UserRecord {
    /// Create a record with no current token
    pub fn new(
        identity: impl Into<String>,
        password_hash: impl Into<String>,
        tenant_id: i64,
    ) -> Self {
        Self {
            identity: identity.into(),
            password_hash: password_hash.into(),
            tenant_id,
            current_token: String::new(),
        }
    }

    /// Whether a token is currently on file
    pub fn has_token(&self) -> bool {
        !self.current_token.is_empty()
    }
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("identity", &self.identity)
            .field("tenant_id", &self.tenant_id)
            .field("has_token", &self.has_token())
            .finish_non_exhaustive()
    }
}
