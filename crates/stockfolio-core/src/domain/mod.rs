//! # Domain Models
//!
//! Value objects produced by the market-data core. All of them are created
//! fresh per request and none are persisted here; the cache only ever holds
//! their JSON form.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SearchResult`] | One normalized symbol-search match |
//! | [`DailyPrice`] | OHLCV for one trading day |
//! | [`Quote`] | Latest quote for a symbol |
//! | [`MarketSession`] | Open / pre-market / after-hours / closed |
//! | [`PriceLookup`] | Daily price plus the date that was asked for |
//! | [`QuoteSnapshot`] | Quote plus the session it was served in |
//! | [`Symbol`] | Validated, uppercased ticker |
//! | [`SearchQuery`] | Validated free-text query |
//! | [`TradingDate`] | `YYYY-MM-DD` calendar date |

mod date;
mod models;
mod query;
mod symbol;

pub use date::TradingDate;
pub use models::{DailyPrice, MarketSession, PriceLookup, Quote, QuoteSnapshot, SearchResult};
pub use query::SearchQuery;
pub use symbol::Symbol;
