//! In-memory identity store
//!
//! Used by tests and local development. Honors the same single-active-token
//! contract as the remote store and counts calls so callers can assert that
//! an operation never reached the store.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{StoreError, StoreResult};
use crate::models::UserRecord;
use crate::repo::IdentityStore;

/// In-memory identity store
#[derive(Default, Clone)]
pub struct MemoryIdentityStore {
    users: Arc<DashMap<String, UserRecord>>,
    calls: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record
    pub fn insert_user(&self, record: UserRecord) {
        self.users.insert(record.identity.clone(), record);
    }

    /// Snapshot of a record, bypassing the call counter
    pub fn get(&self, identity: &str) -> Option<UserRecord> {
        self.users.get(identity).map(|r| r.value().clone())
    }

    /// Change a user's tenant without touching the current token
    pub fn set_tenant(&self, identity: &str, tenant_id: i64) {
        if let Some(mut user) = self.users.get_mut(identity) {
            user.tenant_id = tenant_id;
        }
    }

    /// Number of trait calls served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every call fail as if the store were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make token writes fail while reads keep working
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn enter(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }

    fn enter_write(&self) -> StoreResult<()> {
        self.enter()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_user(&self, identity: &str) -> StoreResult<Option<UserRecord>> {
        self.enter()?;
        Ok(self.get(identity))
    }

    async fn update_token(&self, identity: &str, token: &str) -> StoreResult<()> {
        self.enter_write()?;
        let mut user = self.users.get_mut(identity).ok_or(StoreError::NotFound)?;
        user.current_token = token.to_string();
        Ok(())
    }

    async fn clear_token(&self, identity: &str, _token: &str) -> StoreResult<()> {
        self.enter_write()?;
        let mut user = self.users.get_mut(identity).ok_or(StoreError::NotFound)?;
        user.current_token.clear();
        Ok(())
    }
}

impl std::fmt::Debug for MemoryIdentityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryIdentityStore")
            .field("users", &self.users.len())
            .field("calls", &self.calls())
            .finish_non_exhaustive()
    }
}
