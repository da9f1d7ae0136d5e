//! HTTP client for the remote identity store

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{StoreError, StoreResult};
use crate::models::UserRecord;
use crate::repo::IdentityStore;

/// Remote identity store configuration
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// Base URL of the store API (e.g., http://web:8000)
    pub base_url: String,
    /// Name this service identifies itself with on every call
    pub service_name: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl HttpStoreConfig {
    /// Create a new store config with default timeouts
    pub fn new(base_url: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            service_name: service_name.into(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the URL for an API path
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Serialize)]
struct ServiceName<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct TokenData<'a> {
    login: &'a str,
    jwt_token: &'a str,
}

/// Body of token update and delete calls
#[derive(Serialize)]
struct TokenRequest<'a> {
    micro_name: ServiceName<'a>,
    token_data: TokenData<'a>,
}

#[derive(Deserialize)]
struct UserDataResponse {
    #[serde(default)]
    data: Option<UserRecord>,
}

/// Identity store reached over HTTP with JSON bodies.
///
/// Any status other than 200 is a failure. No retries are attempted.
#[derive(Clone)]
pub struct HttpIdentityStore {
    config: HttpStoreConfig,
    http_client: reqwest::Client,
}

impl HttpIdentityStore {
    /// Create a store client with a pooled HTTP client
    pub fn new(config: HttpStoreConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            config,
            http_client,
        }
    }

    /// Create a store client with a caller-provided HTTP client
    pub fn with_client(config: HttpStoreConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Store configuration
    pub fn config(&self) -> &HttpStoreConfig {
        &self.config
    }

    fn token_request<'a>(&'a self, identity: &'a str, token: &'a str) -> TokenRequest<'a> {
        TokenRequest {
            micro_name: ServiceName {
                name: &self.config.service_name,
            },
            token_data: TokenData {
                login: identity,
                jwt_token: token,
            },
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> StoreResult<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "Identity store request failed");
            StoreError::Transport(e)
        })?;

        if response.status() != reqwest::StatusCode::OK {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status, body = %body, "Identity store returned an error");
            return Err(StoreError::Status { status, body });
        }

        Ok(response)
    }
}

#[async_trait]
impl IdentityStore for HttpIdentityStore {
    async fn find_user(&self, identity: &str) -> StoreResult<Option<UserRecord>> {
        let url = self.config.url("get_user_data/");
        tracing::debug!(identity, %url, "Fetching user record");

        let request = self
            .http_client
            .post(&url)
            .query(&[("username", identity)])
            .json(&ServiceName {
                name: &self.config.service_name,
            });

        let response = match self.send(request).await {
            Ok(response) => response,
            Err(StoreError::Status { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let body: UserDataResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to decode user record");
            StoreError::Decode(e.to_string())
        })?;

        match body.data {
            Some(record) if !record.identity.is_empty() => Ok(Some(record)),
            _ => {
                tracing::debug!(identity, "Identity store has no record");
                Ok(None)
            }
        }
    }

    async fn update_token(&self, identity: &str, token: &str) -> StoreResult<()> {
        let url = self.config.url("token/update");
        tracing::debug!(identity, "Storing current token");

        let request = self
            .http_client
            .post(&url)
            .json(&self.token_request(identity, token));

        self.send(request).await?;
        Ok(())
    }

    async fn clear_token(&self, identity: &str, token: &str) -> StoreResult<()> {
        let url = self.config.url("token/delete");
        tracing::debug!(identity, "Clearing current token");

        let request = self
            .http_client
            .delete(&url)
            .json(&self.token_request(identity, token));

        self.send(request).await?;
        Ok(())
    }
}

impl std::fmt::Debug for HttpIdentityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpIdentityStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
