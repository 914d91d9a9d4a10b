mod cache;
mod price;
mod quote;
mod search;

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use stockfolio_core::{
    AppConfig, CacheStore, ConfigError, MarketDataClient, MarketDataService, NoopCacheStore,
    RedisCacheConfig, RedisCacheStore, ReqwestHttpClient,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let config = AppConfig::from_env()?;
    let service = build_service(config).await?;

    match &cli.command {
        Command::Search(args) => search::run(args, &service).await,
        Command::Price(args) => price::run(args, &service).await,
        Command::Quote(args) => quote::run(args, &service).await,
        Command::Cache(args) => cache::run(args, &service).await,
    }
}

async fn build_service(config: AppConfig) -> Result<MarketDataService, CliError> {
    let http_client = Arc::new(ReqwestHttpClient::new()?);
    let client = MarketDataClient::new(config.market_data, http_client)?;
    let cache = build_cache(config.cache_url).await?;
    Ok(MarketDataService::new(client, cache))
}

async fn build_cache(url: Option<String>) -> Result<Arc<dyn CacheStore>, CliError> {
    let Some(url) = url else {
        info!("REDIS_URL not set, running without cache");
        return Ok(Arc::new(NoopCacheStore));
    };

    match RedisCacheStore::connect(RedisCacheConfig::new(url.clone())).await {
        Ok(store) => Ok(Arc::new(store)),
        Err(error) => {
            warn!(%error, "rejecting malformed redis url");
            Err(ConfigError::InvalidValue {
                name: "REDIS_URL",
                value: url,
            }
            .into())
        }
    }
}
