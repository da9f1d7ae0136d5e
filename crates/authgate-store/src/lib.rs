//! Authgate Store - Remote identity store boundary
//!
//! The identity store is the system of record for user credentials and for the
//! single token that is currently valid for each identity. Authgate keeps no
//! local state, so every validation is cross-checked against this store.
//!
//! # Example
//!
//! ```rust,ignore
//! use authgate_store::{HttpIdentityStore, HttpStoreConfig, IdentityStore};
//!
//! let store = HttpIdentityStore::new(HttpStoreConfig::new("http://web:8000", "auth-service"));
//! let record = store.find_user("alice").await?;
//! ```

pub mod error;
pub mod http;
pub mod memory;
pub mod models;
pub mod repo;

pub use error::{StoreError, StoreResult};
pub use http::{HttpIdentityStore, HttpStoreConfig};
pub use memory::MemoryIdentityStore;
pub use models::UserRecord;
pub use repo::IdentityStore;
