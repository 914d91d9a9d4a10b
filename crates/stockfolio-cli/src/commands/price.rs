use stockfolio_core::MarketDataService;

use crate::cli::PriceArgs;
use crate::error::CliError;

pub async fn run(
    args: &PriceArgs,
    service: &MarketDataService,
) -> Result<serde_json::Value, CliError> {
    let lookup = service
        .historical_price(&args.symbol, args.date.as_deref())
        .await?
        .ok_or_else(|| {
            CliError::NotFound(format!(
                "no trading day on or before {} for {}",
                args.date.as_deref().unwrap_or("today"),
                args.symbol.trim().to_uppercase()
            ))
        })?;
    Ok(serde_json::to_value(lookup)?)
}
