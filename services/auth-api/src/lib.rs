//! Authgate Auth API
//!
//! Token gateway service.
//!
//! ## REST Endpoints
//!
//! - `POST /login` - JSON credentials, returns a bearer token
//! - `POST /token/create` - Form credentials, returns a bearer token
//! - `POST /token/verify` - Check the presented token
//! - `POST /token/refresh` - Swap the presented token for a new one
//! - `POST /logout` - Revoke the presented token
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /metrics` - Prometheus metrics

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod state;
