//! Request gate tests driven through a router with `oneshot`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use authgate_axum::{GateLayer, RequireAuth};
use authgate_core::{crypto::hash_password, AuthConfig, Credentials, TokenService};
use authgate_store::{MemoryIdentityStore, UserRecord};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

struct Harness {
    store: MemoryIdentityStore,
    tokens: Arc<TokenService<MemoryIdentityStore>>,
    hits: Arc<AtomicUsize>,
}

impl Harness {
    fn new() -> Self {
        let store = MemoryIdentityStore::new();
        let hash = hash_password("pw1", 4).unwrap();
        store.insert_user(UserRecord::new("alice", hash, 7));

        let tokens = Arc::new(TokenService::new(
            AuthConfig::generated(),
            Arc::new(store.clone()),
        ));

        Self {
            store,
            tokens,
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn router(&self) -> Router {
        let hits = Arc::clone(&self.hits);
        Router::new()
            .route(
                "/whoami",
                post(move |auth: RequireAuth| {
                    let hits = Arc::clone(&hits);
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        format!("{}:{}", auth.identity(), auth.tenant_id())
                    }
                }),
            )
            .route_layer(GateLayer::new(Arc::clone(&self.tokens)))
            .route(
                "/open",
                get(|auth: RequireAuth| async move { auth.identity().to_string() }),
            )
    }

    async fn login(&self) -> String {
        self.tokens
            .login(&Credentials::new("alice", "pw1"))
            .await
            .unwrap()
            .access_token
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn whoami(authorization: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/whoami");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn error_code(response: axum::response::Response) -> String {
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    body["error"]["code"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn missing_header_is_rejected_before_handler() {
    let harness = Harness::new();

    let response = harness.router().oneshot(whoami(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(response).await, "MISSING_CREDENTIALS");
    assert_eq!(harness.hits(), 0);
    assert_eq!(harness.store.calls(), 0);
}

#[tokio::test]
async fn bearer_token_reaches_handler() {
    let harness = Harness::new();
    let token = harness.login().await;

    let response = harness
        .router()
        .oneshot(whoami(Some(format!("Bearer {token}"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "alice:7");
    assert_eq!(harness.hits(), 1);
}

#[tokio::test]
async fn lowercase_bearer_prefix_accepted() {
    let harness = Harness::new();
    let token = harness.login().await;

    let response = harness
        .router()
        .oneshot(whoami(Some(format!("bearer {token}"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn raw_token_without_prefix_accepted() {
    let harness = Harness::new();
    let token = harness.login().await;

    let response = harness.router().oneshot(whoami(Some(token))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "alice:7");
}

#[tokio::test]
async fn garbled_token_rejected_without_store_call() {
    let harness = Harness::new();

    let response = harness
        .router()
        .oneshot(whoami(Some("Bearer not-a-token".to_string())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(response).await, "MALFORMED_TOKEN");
    assert_eq!(harness.store.calls(), 0);
    assert_eq!(harness.hits(), 0);
}

#[tokio::test]
async fn superseded_token_rejected() {
    let harness = Harness::new();
    let old = harness.login().await;
    let _new = harness.login().await;

    let response = harness
        .router()
        .oneshot(whoami(Some(format!("Bearer {old}"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(response).await, "TOKEN_MISMATCH");
    assert_eq!(harness.hits(), 0);
}

#[tokio::test]
async fn store_outage_is_unauthorized_with_sanitized_message() {
    let harness = Harness::new();
    let token = harness.login().await;
    harness.store.set_unavailable(true);

    let response = harness
        .router()
        .oneshot(whoami(Some(format!("Bearer {token}"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value =
        serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"]["code"], "UPSTREAM_UNAVAILABLE");
    assert_eq!(body["error"]["message"], "identity store unavailable");
}

#[tokio::test]
async fn ungated_route_rejects_require_auth() {
    let harness = Harness::new();
    let token = harness.login().await;
    let calls_before = harness.store.calls();

    let request = Request::builder()
        .uri("/open")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    let response = harness.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(harness.store.calls(), calls_before);

    let body: serde_json::Value =
        serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"]["code"], "UNAUTHENTICATED");
}
