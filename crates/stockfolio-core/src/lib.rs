//! # Stockfolio Core
//!
//! Market-data retrieval and caching for the Stockfolio portfolio tracker.
//!
//! ## Overview
//!
//! - **Symbol search**, **historical daily prices** and **current quotes**
//!   from the Alpha Vantage API
//! - **Cache-aside** storage of every result with per-operation TTLs
//! - **Retries with backoff** for transport failures
//! - **Graceful degradation** when the cache is unreachable
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Best-effort TTL cache (redis, in-memory, no-op) |
//! | [`client`] | Provider client with retry and error detection |
//! | [`config`] | Environment-driven configuration |
//! | [`domain`] | Domain models (SearchResult, DailyPrice, Quote, Symbol) |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`payload`] | Provider wire shapes |
//! | [`resolver`] | Payload normalization and trading-day fallback |
//! | [`retry`] | Retry budget and backoff |
//! | [`service`] | Cache-aside orchestration |
//! | [`session`] | Market session classification and clocks |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockfolio_core::{
//!     AppConfig, MarketDataClient, MarketDataService, NoopCacheStore, ReqwestHttpClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let client = MarketDataClient::new(config.market_data, Arc::new(ReqwestHttpClient::new()?))?;
//!     let service = MarketDataService::new(client, Arc::new(NoopCacheStore));
//!
//!     if let Some(lookup) = service.historical_price("AAPL", Some("2024-01-13")).await? {
//!         println!("{} closed at {}", lookup.price.date, lookup.price.close);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / Host     │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ MarketData      │────▶│ CacheStore       │
//! │ Service         │     │ (redis/memory)   │
//! └────────┬────────┘     └──────────────────┘
//!          │ miss
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ MarketData      │────▶│ HTTP Client      │
//! │ Client (retry)  │     │ (reqwest)        │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Resolver        │
//! │ (normalize)     │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Service operations fail only with [`MarketDataError`]: invalid input, or
//! the provider being unavailable. Cache failures are logged and otherwise
//! invisible. "Not found" is `Ok(None)`.
//!
//! ## Security
//!
//! - The API key is read from the environment and never logged
//! - Transport errors are stripped of the request URL

pub mod cache;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod logging;
pub mod payload;
pub mod resolver;
pub mod retry;
pub mod service;
pub mod session;

// Caching
pub use cache::{
    CacheStore, CacheStoreExt, ConnectionState, MemoryCacheStore, NoopCacheStore,
    RedisCacheConfig, RedisCacheStore, Ttl,
};

// Provider client
pub use client::{MarketDataClient, ProviderFunction};

// Configuration
pub use config::{AppConfig, MarketDataConfig};

// Domain models
pub use domain::{
    DailyPrice, MarketSession, PriceLookup, Quote, QuoteSnapshot, SearchQuery, SearchResult,
    Symbol, TradingDate,
};

// Error types
pub use error::{ConfigError, MarketDataError, ProviderError, ValidationError};

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Logging
pub use logging::{init_logging, LogConfig, LogFormat, LoggingError};

// Retry logic
pub use retry::RetryConfig;

// Orchestration
pub use service::MarketDataService;

// Sessions
pub use session::{classify_market_session, Clock, FixedClock, SystemClock};
