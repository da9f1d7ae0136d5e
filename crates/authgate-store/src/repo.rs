//! Identity store trait
//!
//! # Single active token
//!
//! The store holds at most one current token per identity. This is the only
//! revocation mechanism authgate has: a signed token stays cryptographically
//! valid until it expires, so validation compares the presented token against
//! the one on file. `update_token` replaces the current token and `clear_token`
//! empties it; either makes every previously issued token fail that comparison.
//!
//! Concurrent writes for the same identity are resolved by the store, last
//! write wins.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::UserRecord;

/// Identity store interface
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Fetch the record for an identity, `None` if the store does not know it
    async fn find_user(&self, identity: &str) -> StoreResult<Option<UserRecord>>;

    /// Make `token` the single current token for `identity`
    async fn update_token(&self, identity: &str, token: &str) -> StoreResult<()>;

    /// Clear the current token for `identity`.
    ///
    /// `token` is the value being cleared; the store receives it for audit.
    async fn clear_token(&self, identity: &str, token: &str) -> StoreResult<()>;
}
