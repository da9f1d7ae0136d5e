//! Common test utilities for authgate-core integration tests

use authgate_core::{crypto::hash_password, AuthConfig, TokenService};
use authgate_store::{MemoryIdentityStore, UserRecord};
use std::sync::Arc;

/// bcrypt cost low enough to keep tests fast
pub const TEST_BCRYPT_COST: u32 = 4;

/// Store seeded with alice / pw1 / tenant 7
pub fn seeded_store() -> MemoryIdentityStore {
    let store = MemoryIdentityStore::new();
    add_user(&store, "alice", "pw1", 7);
    store
}

pub fn add_user(store: &MemoryIdentityStore, identity: &str, password: &str, tenant_id: i64) {
    let hash = hash_password(password, TEST_BCRYPT_COST).expect("hash password");
    store.insert_user(UserRecord::new(identity, hash, tenant_id));
}

/// Token service over a shared handle to `store`
#[allow(dead_code)]
pub fn service(store: &MemoryIdentityStore) -> TokenService<MemoryIdentityStore> {
    TokenService::new(AuthConfig::generated(), Arc::new(store.clone()))
}
