//! CLI argument definitions.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `search` | Search symbols by name or ticker |
//! | `price` | Daily price for a date, with trading-day fallback |
//! | `quote` | Current quote with market session |
//! | `cache` | Inspect or clear the cache |
//!
//! # Examples
//!
//! ```bash
//! stockfolio search apple
//! stockfolio price AAPL --date 2024-01-13 --pretty
//! stockfolio quote msft
//! stockfolio cache health
//! ```

use clap::{Args, Parser, Subcommand};

/// Stockfolio market data: symbol search, historical prices and quotes.
///
/// Requires ALPHA_VANTAGE_API_KEY. Set REDIS_URL to enable caching.
#[derive(Debug, Parser)]
#[command(name = "stockfolio", author, version, about = "Stockfolio market data CLI")]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search symbols by company name or ticker.
    ///
    ///   stockfolio search apple
    Search(SearchArgs),

    /// Daily OHLCV for a date; weekends and holidays resolve to the
    /// previous trading day.
    ///
    ///   stockfolio price AAPL --date 2024-01-13
    Price(PriceArgs),

    /// Current quote with market session and refresh hint.
    ///
    ///   stockfolio quote AAPL
    Quote(QuoteArgs),

    /// Cache management commands.
    Cache(CacheArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-form search query (1 to 50 characters).
    pub query: String,
}

#[derive(Debug, Args)]
pub struct PriceArgs {
    /// Ticker symbol, e.g. AAPL.
    pub symbol: String,

    /// Trading date as YYYY-MM-DD. Defaults to today (UTC).
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Ticker symbol, e.g. AAPL.
    pub symbol: String,
}

#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Report the cache connection state.
    Health,
    /// Drop every cached entry.
    Clear,
}
