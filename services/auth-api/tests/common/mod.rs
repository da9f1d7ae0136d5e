//! Common test utilities for auth-api integration tests

use auth_api::app::build_router;
use auth_api::config::Config;
use auth_api::state::AppState;
use authgate_core::crypto::hash_password;
use authgate_core::TokenService;
use authgate_store::{IdentityStore, MemoryIdentityStore, UserRecord};
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use std::sync::Arc;

/// Default configuration with a generated secret
pub fn test_config() -> Config {
    Config::from_lookup(|_| None).expect("default config")
}

/// Store seeded with alice / pw1 / tenant 7
pub fn seeded_store() -> MemoryIdentityStore {
    let store = MemoryIdentityStore::new();
    let hash = hash_password("pw1", 4).expect("hash password");
    store.insert_user(UserRecord::new("alice", hash, 7));
    store
}

/// Router over any identity store
pub fn router_with<S: IdentityStore + 'static>(store: S) -> Router {
    let config = test_config();
    let tokens = TokenService::new(config.auth.clone(), Arc::new(store));
    build_router(AppState::new(tokens, config), None)
}

/// Router sharing `store` with the caller
pub fn router(store: &MemoryIdentityStore) -> Router {
    router_with(store.clone())
}

pub fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn bearer_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
