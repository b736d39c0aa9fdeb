pub mod api;
pub mod converter;
pub mod core;
pub mod error;
pub mod providers;

use crate::api::AppState;
use crate::converter::{CurrencyConverter, RateCache};
use crate::core::config::AppConfig;
use crate::providers::OpenErApiProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds the shared request state. The rate cache created here lives for
/// the rest of the process.
pub fn build_state(config: &AppConfig) -> Result<Arc<AppState<OpenErApiProvider>>> {
    let provider_config = &config.providers.exchange_rate;
    let provider = OpenErApiProvider::new(&provider_config.base_url, provider_config.timeout())?;
    let cache = Arc::new(RateCache::new());
    let converter = CurrencyConverter::new(provider, cache, config.cache.ttl());
    Ok(Arc::new(AppState { converter }))
}

pub async fn run(config: AppConfig) -> Result<()> {
    info!("Currency converter starting...");
    debug!("Loaded config: {config:#?}");

    let state = build_state(&config)?;
    api::serve(config.listen_addr(), state).await
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    }
}
