//! Router assembly

use std::sync::Arc;

use authgate_axum::GateLayer;
use authgate_store::IdentityStore;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers;
use crate::state::AppState;

/// Build the HTTP router.
///
/// Only the token-bearing routes sit behind the gate; login and token
/// creation are open.
pub fn build_router<S>(state: AppState<S>, metrics_handle: Option<PrometheusHandle>) -> Router
where
    S: IdentityStore + 'static,
{
    let request_timeout = state.request_timeout();

    // Routes that need a current token
    let gated = Router::new()
        .route("/token/verify", post(handlers::verify_token))
        .route("/token/refresh", post(handlers::refresh_token::<S>))
        .route("/logout", post(handlers::logout::<S>))
        .route_layer(GateLayer::new(Arc::clone(&state.tokens)));

    // Credential exchange
    let open = Router::new()
        .route("/login", post(handlers::login::<S>))
        .route("/token/create", post(handlers::create_token::<S>));

    // Health route (no timeout - must always respond quickly)
    let health_routes = Router::new().route("/health", get(handlers::health::<S>));

    // Metrics route (no timeout)
    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Request timeout (innermost - closest to handler)
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .merge(open)
        .merge(gated)
        .layer(middleware)
        .merge(health_routes)
        .merge(metrics_route)
        .with_state(state)
}
