//! Authgate Axum Integration
//!
//! Axum middleware and extractors for putting routes behind token validation.
//!
//! # Quick Start
//!
//! ```ignore
//! use authgate_axum::{GateLayer, RequireAuth};
//! use axum::{Router, routing::post};
//!
//! async fn whoami(auth: RequireAuth) -> String {
//!     format!("{} ({})", auth.identity(), auth.tenant_id())
//! }
//!
//! let app = Router::new()
//!     .route("/whoami", post(whoami))
//!     .route_layer(GateLayer::new(token_service));
//! ```
//!
//! # Extractors
//!
//! - [`RequireAuth`] - Requires a request that passed the gate (401 otherwise)

pub mod context;
pub mod error;
pub mod extractors;
pub mod layer;

// Re-export primary types
pub use context::{AuthContext, AuthSource};
pub use error::GateError;
pub use extractors::{AuthContextExt, RequireAuth};
pub use layer::{extract_token, GateFuture, GateLayer, GateService};
