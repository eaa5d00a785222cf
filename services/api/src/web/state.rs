//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use chrono::Duration;
use doclens_core::extraction::ExtractionChain;
use doclens_core::ports::UserStore;
use doclens_core::prefs::PreferenceStore;
use doclens_core::token::TokenService;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all
/// handlers. Nothing in here is mutated across requests except the
/// preference store, which serializes its own writers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<dyn UserStore>,
    pub tokens: Arc<TokenService>,
    pub extraction: Arc<ExtractionChain>,
    pub prefs: Arc<PreferenceStore>,
}

impl AppState {
    /// Lifetime of newly issued session tokens.
    pub fn token_ttl(&self) -> Duration {
        Duration::days(self.config.token_ttl_days)
    }

    /// Remaining lifetime below which the middleware reissues a token.
    pub fn renewal_threshold(&self) -> Duration {
        Duration::days(self.config.token_renewal_threshold_days)
    }
}
