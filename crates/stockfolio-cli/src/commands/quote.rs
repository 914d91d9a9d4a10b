use stockfolio_core::MarketDataService;

use crate::cli::QuoteArgs;
use crate::error::CliError;

pub async fn run(
    args: &QuoteArgs,
    service: &MarketDataService,
) -> Result<serde_json::Value, CliError> {
    let snapshot = service
        .current_quote(&args.symbol)
        .await?
        .ok_or_else(|| {
            CliError::NotFound(format!(
                "no quote data for {}",
                args.symbol.trim().to_uppercase()
            ))
        })?;
    Ok(serde_json::to_value(snapshot)?)
}
