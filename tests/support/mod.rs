//! Shared fixtures for the behaviour suites: a scripted provider transport
//! and canned provider payloads.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stockfolio_core::{
    CacheStore, FixedClock, HttpClient, HttpError, HttpRequest, HttpResponse, MarketDataClient,
    MarketDataConfig, MarketDataService, RetryConfig,
};
use time::OffsetDateTime;

pub const SEARCH_BODY: &str = r#"{
  "bestMatches": [
    {
      "1. symbol": "AAPL",
      "2. name": "Apple Inc.",
      "3. type": "Equity",
      "4. region": "United States",
      "5. marketOpen": "09:30",
      "6. marketClose": "16:00",
      "7. timezone": "UTC-04",
      "8. currency": "USD",
      "9. matchScore": "1.0000"
    },
    {
      "1. symbol": "APPL",
      "2. name": "Appleton Partners Inc.",
      "3. type": "Equity",
      "4. region": "United States",
      "5. marketOpen": "09:30",
      "6. marketClose": "16:00",
      "7. timezone": "UTC-04",
      "8. currency": "USD",
      "9. matchScore": "0.8000"
    }
  ]
}"#;

pub const DAILY_BODY: &str = r#"{
  "Meta Data": {
    "1. Information": "Daily Prices (open, high, low, close) and Volumes",
    "2. Symbol": "AAPL",
    "3. Last Refreshed": "2024-01-15",
    "4. Output Size": "Compact",
    "5. Time Zone": "US/Eastern"
  },
  "Time Series (Daily)": {
    "2024-01-15": {
      "1. open": "185.92",
      "2. high": "186.40",
      "3. low": "183.43",
      "4. close": "185.85",
      "5. volume": "47471600"
    },
    "2024-01-12": {
      "1. open": "187.13",
      "2. high": "189.11",
      "3. low": "185.83",
      "4. close": "186.29",
      "5. volume": "54010000"
    }
  }
}"#;

pub const QUOTE_BODY: &str = r#"{
  "Global Quote": {
    "01. symbol": "AAPL",
    "02. open": "185.92",
    "03. high": "186.40",
    "04. low": "183.43",
    "05. price": "185.85",
    "06. volume": "47471600",
    "07. latest trading day": "2024-01-15",
    "08. previous close": "186.29",
    "09. change": "-0.44",
    "10. change percent": "-0.2362%"
  }
}"#;

pub const RATE_LIMIT_BODY: &str = r#"{
  "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."
}"#;

/// Transport that replays a script of responses and records every request.
/// Once the script is exhausted it keeps returning `fallback`.
#[derive(Debug)]
pub struct ScriptedHttpClient {
    script: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    fallback: Result<HttpResponse, HttpError>,
    latency: Duration,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn always(body: &str) -> Arc<Self> {
        Self::scripted(Vec::new(), Ok(HttpResponse::ok_json(body)))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::scripted(Vec::new(), Err(HttpError::new(message)))
    }

    pub fn scripted(
        script: Vec<Result<HttpResponse, HttpError>>,
        fallback: Result<HttpResponse, HttpError>,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback,
            latency: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Same as [`Self::always`], but every response takes `latency` on the
    /// tokio clock.
    pub fn slow(body: &str, latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Ok(HttpResponse::ok_json(body)),
            latency,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .len()
    }

    pub fn recorded_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);
        let response = self
            .script
            .lock()
            .expect("script should not be poisoned")
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        let latency = self.latency;
        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            response
        })
    }
}

pub fn market_data_config() -> MarketDataConfig {
    MarketDataConfig::new("test-key")
        .with_retry(RetryConfig::linear(Duration::from_millis(1_000), 3))
}

pub fn service_at(
    http: Arc<ScriptedHttpClient>,
    cache: Arc<dyn CacheStore>,
    now: OffsetDateTime,
) -> MarketDataService {
    let client =
        MarketDataClient::new(market_data_config(), http).expect("test key should be accepted");
    MarketDataService::new(client, cache).with_clock(Arc::new(FixedClock(now)))
}
