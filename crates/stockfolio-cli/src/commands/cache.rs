use serde::Serialize;

use stockfolio_core::{CacheStore, MarketDataService};

use crate::cli::{CacheArgs, CacheCommand};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct CacheStatusData {
    state: &'static str,
    healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cleared: Option<bool>,
}

pub async fn run(
    args: &CacheArgs,
    service: &MarketDataService,
) -> Result<serde_json::Value, CliError> {
    let cleared = match args.command {
        CacheCommand::Health => None,
        CacheCommand::Clear => Some(service.cache().clear().await),
    };

    let state = service.cache_health();
    let data = serde_json::to_value(CacheStatusData {
        state: state.as_str(),
        healthy: service.cache().is_healthy(),
        cleared,
    })?;
    Ok(data)
}
