//! Authgate Auth API
//!
//! Token gateway binary. See the library crate for the route list.

use std::net::SocketAddr;
use std::sync::Arc;

use auth_api::app::build_router;
use auth_api::config::Config;
use auth_api::state::AppState;
use authgate_core::TokenService;
use authgate_store::{HttpIdentityStore, HttpStoreConfig};
use axum::Router;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging; RUST_LOG wins over LOG_LEVEL
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)?,
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Authgate Auth API");
    tracing::info!(
        service = %config.service_name,
        http_port = config.http_port,
        identity_store = %config.identity_store_url,
        algorithm = ?config.auth.algorithm,
        token_ttl_secs = config.auth.token_ttl.as_secs(),
        "Configuration loaded"
    );
    if config.secret_generated {
        tracing::warn!(
            "TOKEN_SECRET not set, using a generated signing secret; \
             issued tokens will not survive a restart"
        );
    }

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Identity store client
    let store = HttpIdentityStore::new(
        HttpStoreConfig::new(&config.identity_store_url, &config.service_name)
            .with_timeout(config.identity_store_timeout),
    );

    // Token service and application state
    let tokens = TokenService::new(config.auth.clone(), Arc::new(store));
    let http_addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let state = AppState::new(tokens, config);

    let app = build_router(state, metrics_handle);
    run_http_server(app, http_addr).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn run_http_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Register metrics with descriptions
    metrics::describe_counter!(
        "authgate_tokens_issued_total",
        "Total tokens issued by path (login, refresh)"
    );
    metrics::describe_counter!(
        "authgate_validation_failures_total",
        "Total failed token validations by reason"
    );
    metrics::describe_counter!("authgate_tokens_revoked_total", "Total tokens revoked");

    Ok(handle)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
