use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Symbol, TradingDate};

/// One normalized match of a symbol search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub symbol: String,
    pub name: String,
    pub security_type: String,
    pub region: String,
    pub market_open: String,
    pub market_close: String,
    pub timezone: String,
    pub currency: String,
    /// Provider relevance score in `[0, 1]`.
    pub match_score: f64,
}

/// Daily OHLCV record for one trading day.
///
/// `date` is the trading day the values belong to, which can be earlier than
/// the date that was asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPrice {
    pub symbol: Symbol,
    pub date: TradingDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Latest quote for a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: Symbol,
    pub current_price: Decimal,
    pub open_price: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    pub previous_close: Decimal,
    /// Always `current_price - previous_close`.
    pub change: Decimal,
    /// Provider-reported percentage, e.g. `-0.2362` for `-0.2362%`.
    pub change_percent: Decimal,
    pub volume: u64,
    pub last_trading_day: TradingDate,
}

/// Trading-activity band of the US equity market at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarketSession {
    Open,
    PreMarket,
    AfterHours,
    Closed,
}

impl MarketSession {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::PreMarket => "pre-market",
            Self::AfterHours => "after-hours",
            Self::Closed => "closed",
        }
    }

    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl Display for MarketSession {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a historical price lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLookup {
    pub price: DailyPrice,
    pub requested_date: TradingDate,
    /// True when `price.date` is an earlier trading day than `requested_date`.
    pub is_closest_trading_day: bool,
}

impl PriceLookup {
    pub fn new(price: DailyPrice, requested_date: TradingDate) -> Self {
        let is_closest_trading_day = price.date != requested_date;
        Self {
            price,
            requested_date,
            is_closest_trading_day,
        }
    }
}

/// Quote plus the session context it was served in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub quote: Quote,
    pub market_session: MarketSession,
    pub is_real_time: bool,
    /// Seconds until a refreshed quote can be expected.
    pub next_update_in_secs: u64,
}
