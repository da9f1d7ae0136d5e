//! Token handlers (login, create, verify, refresh, logout)

use authgate_axum::RequireAuth;
use authgate_core::{AuthError, Credentials, IssuedToken};
use authgate_store::IdentityStore;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::State;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Form body of `POST /token/create`
#[derive(Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

macro_rules! redacted_debug {
    ($ty:ident) => {
        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("username", &self.username)
                    .field("password", &"[REDACTED]")
                    .finish()
            }
        }
    };
}

redacted_debug!(LoginRequest);
redacted_debug!(TokenForm);

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            access_token: issued.access_token,
            token_type: issued.token_type.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub username: String,
    pub agency_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /login
///
/// Exchange JSON credentials for a bearer token
pub async fn login<S: IdentityStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(req) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Rejected login body");
        ApiError::BadRequest(e.body_text())
    })?;

    let issued = state
        .tokens
        .login(&Credentials::new(req.username, req.password))
        .await?;

    Ok(Json(issued.into()))
}

/// POST /token/create
///
/// Form-encoded variant of login. Unknown user and wrong password share one
/// answer.
pub async fn create_token<S: IdentityStore>(
    State(state): State<AppState<S>>,
    payload: Result<Form<TokenForm>, FormRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Form(form) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Rejected token form");
        ApiError::BadRequest(e.body_text())
    })?;

    let issued = state
        .tokens
        .login(&Credentials::new(form.username, form.password))
        .await
        .map_err(|e| match e {
            AuthError::IdentityNotFound | AuthError::InvalidCredentials => {
                ApiError::Compat(AuthError::InvalidCredentials)
            }
            other => ApiError::Compat(other),
        })?;

    Ok(Json(issued.into()))
}

/// POST /token/verify
///
/// The gate already did the work; echo what it found.
pub async fn verify_token(auth: RequireAuth) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        valid: true,
        username: auth.identity().to_string(),
        agency_id: auth.tenant_id(),
    })
}

/// POST /token/refresh
///
/// Issue a new token and supersede the presented one
pub async fn refresh_token<S: IdentityStore>(
    State(state): State<AppState<S>>,
    auth: RequireAuth,
) -> ApiResult<Json<TokenResponse>> {
    let issued = state
        .tokens
        .refresh(&auth.claims)
        .await
        .map_err(ApiError::Compat)?;

    Ok(Json(issued.into()))
}

/// POST /logout
///
/// Revoke the presented token
pub async fn logout<S: IdentityStore>(
    State(state): State<AppState<S>>,
    auth: RequireAuth,
) -> ApiResult<Json<LogoutResponse>> {
    state.tokens.revoke(&auth.claims, &auth.token).await?;

    Ok(Json(LogoutResponse {
        message: "successfully logged out".to_string(),
    }))
}
