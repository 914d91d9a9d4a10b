use serde::Serialize;

use stockfolio_core::{MarketDataService, SearchResult};

use crate::cli::SearchArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct SearchResponseData {
    query: String,
    results: Vec<SearchResult>,
}

pub async fn run(
    args: &SearchArgs,
    service: &MarketDataService,
) -> Result<serde_json::Value, CliError> {
    let results = service.search(&args.query).await?;
    let data = serde_json::to_value(SearchResponseData {
        query: args.query.trim().to_owned(),
        results,
    })?;
    Ok(data)
}
