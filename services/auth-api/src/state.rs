//! Application state

use std::sync::Arc;
use std::time::Duration;

use authgate_core::TokenService;
use authgate_store::IdentityStore;

use crate::config::Config;

/// Application state shared across handlers
pub struct AppState<S: IdentityStore> {
    /// Token lifecycle service
    pub tokens: Arc<TokenService<S>>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl<S: IdentityStore> AppState<S> {
    /// Create new application state
    pub fn new(tokens: TokenService<S>, config: Config) -> Self {
        Self {
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> Duration {
        self.config.request_timeout
    }
}

impl<S: IdentityStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            tokens: Arc::clone(&self.tokens),
            config: Arc::clone(&self.config),
        }
    }
}
