use std::sync::Arc;

use crate::config::DashConfig;
use crate::error::DashError;
use crate::market::MarketClient;

/// Shared application state, passed to all route handlers via
/// `axum::extract::State`. Owns the configuration and the market client;
/// database connections are opened per request.
pub struct AppState {
    pub config: DashConfig,
    pub market: MarketClient,
}

impl AppState {
    pub fn new(config: DashConfig) -> Result<Arc<Self>, DashError> {
        let market = MarketClient::new(config.market_base_url.clone())?;
        Ok(Arc::new(Self { config, market }))
    }
}
