//! Shared application state.
//!
//! `AppState` is injected into axum handlers via the `State` extractor.
//! It holds the shared HTTP client (discovery + blob fetches) and the
//! session service — the sole owner of the process-wide session slot.
//! Handlers never touch the session except through the service.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::services::GatewayError;
use crate::services::session::{SessionService, WsConnector};

/// Clone is required by axum — inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub sessions: Arc<SessionService>,
}

impl AppState {
    /// Build the shared state from configuration.
    ///
    /// # Errors
    ///
    /// Fails only when the HTTP client cannot be constructed.
    pub fn new(config: Config) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()?;

        let connector = WsConnector::new(http.clone(), config.base_host, config.timeouts);
        let sessions =
            Arc::new(SessionService::new(Arc::new(connector), config.account, config.secret));

        Ok(Self { http, sessions })
    }
}
