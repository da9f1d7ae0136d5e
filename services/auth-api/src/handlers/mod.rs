//! HTTP handlers

mod auth;
mod health;

pub use auth::{create_token, login, logout, refresh_token, verify_token};
pub use auth::{LoginRequest, LogoutResponse, TokenForm, TokenResponse, VerifyResponse};
pub use health::{health, HealthResponse};
