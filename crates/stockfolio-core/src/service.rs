//! Cache-aside orchestration of the market-data operations.
//!
//! | Operation | Cache key | TTL |
//! |-----------|-----------|-----|
//! | [`MarketDataService::search`] | `stock_search:{query}` | 1 hour |
//! | [`MarketDataService::historical_price`] | `stock_price:{SYMBOL}:{date}` | 24 hours |
//! | [`MarketDataService::current_quote`] | `stock_current:{SYMBOL}` | 60 s open, 300 s otherwise |

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::cache::{CacheStore, CacheStoreExt, ConnectionState, Ttl};
use crate::client::{MarketDataClient, ProviderFunction};
use crate::payload::{DailySeriesPayload, GlobalQuotePayload, SymbolSearchPayload};
use crate::resolver::{normalize_quote, normalize_search, resolve_historical_price};
use crate::session::{classify_market_session, Clock, SystemClock};
use crate::{
    DailyPrice, MarketDataError, MarketSession, PriceLookup, ProviderError, Quote, QuoteSnapshot,
    SearchQuery, SearchResult, Symbol, TradingDate,
};

pub const SEARCH_TTL: Ttl = Ttl::from_secs(3_600);
pub const HISTORICAL_PRICE_TTL: Ttl = Ttl::from_secs(86_400);
pub const QUOTE_TTL_OPEN: Ttl = Ttl::from_secs(60);
pub const QUOTE_TTL_CLOSED: Ttl = Ttl::from_secs(300);

const SEARCH_OPERATION: &str = "search stocks";
const PRICE_OPERATION: &str = "get stock price";
const QUOTE_OPERATION: &str = "get current quote";

pub fn search_key(query: &SearchQuery) -> String {
    format!("stock_search:{}", query.cache_form())
}

pub fn price_key(symbol: &Symbol, date: TradingDate) -> String {
    format!("stock_price:{symbol}:{date}")
}

pub fn quote_key(symbol: &Symbol) -> String {
    format!("stock_current:{symbol}")
}

/// Quote freshness for the given session.
pub const fn quote_ttl(session: MarketSession) -> Ttl {
    if session.is_open() {
        QUOTE_TTL_OPEN
    } else {
        QUOTE_TTL_CLOSED
    }
}

/// Entry point for symbol search, historical prices and live quotes.
///
/// Reads go to the cache first; misses call the provider, normalize the
/// payload and store the result. The cache can be down without affecting
/// correctness, only latency and provider quota.
#[derive(Clone)]
pub struct MarketDataService {
    client: MarketDataClient,
    cache: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for MarketDataService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataService")
            .field("client", &self.client)
            .field("cache", &self.cache.connection_state())
            .field("clock", &self.clock)
            .finish()
    }
}

impl MarketDataService {
    pub fn new(client: MarketDataClient, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            client,
            cache,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Search symbols by free text. An empty list is a valid result.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        let query = SearchQuery::parse(query)?;
        let key = search_key(&query);

        if let Some(results) = self.cache.get::<Vec<SearchResult>>(&key).await {
            return Ok(results);
        }

        info!(%query, "searching symbols");
        let payload: SymbolSearchPayload = self
            .client
            .fetch(
                ProviderFunction::SymbolSearch,
                &[("keywords", query.as_str())],
            )
            .await
            .map_err(|err| unavailable(SEARCH_OPERATION, &err))?;

        let results = normalize_search(payload);
        debug!(%query, matches = results.len(), "symbol search resolved");
        self.cache.set(&key, &results, SEARCH_TTL).await;
        Ok(results)
    }

    /// Daily price for `date` (today, UTC, when absent), falling back to the
    /// closest earlier trading day. `Ok(None)` when no such day exists.
    pub async fn historical_price(
        &self,
        symbol: &str,
        date: Option<&str>,
    ) -> Result<Option<PriceLookup>, MarketDataError> {
        let symbol = Symbol::parse(symbol)?;
        let requested = match date {
            Some(raw) => TradingDate::parse(raw)?,
            None => TradingDate::of(self.clock.now_utc()),
        };
        let key = price_key(&symbol, requested);

        if let Some(price) = self.cache.get::<DailyPrice>(&key).await {
            return Ok(Some(PriceLookup::new(price, requested)));
        }

        info!(%symbol, %requested, "fetching daily series");
        let payload: DailySeriesPayload = self
            .client
            .fetch(
                ProviderFunction::TimeSeriesDaily,
                &[("symbol", symbol.as_str()), ("outputsize", "compact")],
            )
            .await
            .map_err(|err| unavailable(PRICE_OPERATION, &err))?;

        let Some(series) = payload.series.as_ref() else {
            let err = ProviderError::Decode(String::from("response has no daily time series"));
            return Err(unavailable(PRICE_OPERATION, &err));
        };

        let Some(price) = resolve_historical_price(series, &symbol, requested, payload.time_zone())
        else {
            info!(%symbol, %requested, "no trading day on or before requested date");
            return Ok(None);
        };

        self.cache.set(&key, &price, HISTORICAL_PRICE_TTL).await;
        Ok(Some(PriceLookup::new(price, requested)))
    }

    /// Latest quote with the session it is served in. `Ok(None)` when the
    /// provider has no quote for the symbol.
    pub async fn current_quote(
        &self,
        symbol: &str,
    ) -> Result<Option<QuoteSnapshot>, MarketDataError> {
        let symbol = Symbol::parse(symbol)?;
        let key = quote_key(&symbol);
        let session = classify_market_session(self.clock.now_utc());
        let ttl = quote_ttl(session);

        let quote = match self.cache.get::<Quote>(&key).await {
            Some(quote) => quote,
            None => {
                info!(%symbol, %session, "fetching global quote");
                let payload: GlobalQuotePayload = self
                    .client
                    .fetch(ProviderFunction::GlobalQuote, &[("symbol", symbol.as_str())])
                    .await
                    .map_err(|err| unavailable(QUOTE_OPERATION, &err))?;

                let Some(quote) = normalize_quote(payload) else {
                    info!(%symbol, "provider returned no quote");
                    return Ok(None);
                };
                self.cache.set(&key, &quote, ttl).await;
                quote
            }
        };

        Ok(Some(QuoteSnapshot {
            quote,
            market_session: session,
            is_real_time: session.is_open(),
            next_update_in_secs: ttl.as_secs(),
        }))
    }

    pub fn cache_health(&self) -> ConnectionState {
        self.cache.connection_state()
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }
}

fn unavailable(operation: &'static str, err: &ProviderError) -> MarketDataError {
    error!(operation, error = %err, "market data request failed");
    MarketDataError::ServiceUnavailable { operation }
}
