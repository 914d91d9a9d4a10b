//! Process configuration read from environment variables.

use std::time::Duration;

use crate::retry::RetryConfig;
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1_000);

const API_KEY_VARS: [&str; 2] = ["ALPHA_VANTAGE_API_KEY", "STOCKFOLIO_ALPHA_VANTAGE_API_KEY"];

/// Settings of the market-data provider client.
#[derive(Clone, PartialEq)]
pub struct MarketDataConfig {
    pub api_key: String,
    pub base_url: String,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl MarketDataConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: String::from(DEFAULT_BASE_URL),
            timeout: DEFAULT_HTTP_TIMEOUT,
            retry: RetryConfig::linear(DEFAULT_RETRY_DELAY, DEFAULT_RETRY_ATTEMPTS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

// Keeps the key out of debug output and logs.
impl std::fmt::Debug for MarketDataConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Everything the host needs to assemble a [`crate::MarketDataService`].
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub market_data: MarketDataConfig,
    /// Redis URL; `None` runs without a cache.
    pub cache_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_key = API_KEY_VARS
            .iter()
            .find_map(|&name| non_blank(name))
            .ok_or(ConfigError::MissingApiKey)?;

        let mut market_data = MarketDataConfig::new(api_key);
        if let Some(base_url) = non_blank("ALPHA_VANTAGE_BASE_URL") {
            market_data.base_url = base_url;
        }
        let timeout_ms = non_blank("STOCKFOLIO_HTTP_TIMEOUT_MS");
        if let Some(ms) = parse_u64("STOCKFOLIO_HTTP_TIMEOUT_MS", timeout_ms)? {
            market_data.timeout = Duration::from_millis(ms.max(1));
        }

        let attempts = match non_blank("STOCKFOLIO_RETRY_ATTEMPTS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(value) if value >= 1 => value,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "STOCKFOLIO_RETRY_ATTEMPTS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_RETRY_ATTEMPTS,
        };
        let delay_ms = non_blank("STOCKFOLIO_RETRY_DELAY_MS");
        let delay = parse_u64("STOCKFOLIO_RETRY_DELAY_MS", delay_ms)?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_RETRY_DELAY);
        market_data.retry = RetryConfig::linear(delay, attempts);

        Ok(Self {
            market_data,
            cache_url: non_blank("REDIS_URL"),
        })
    }
}

fn parse_u64(name: &'static str, raw: Option<String>) -> Result<Option<u64>, ConfigError> {
    raw.map(|value| {
        value
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue { name, value })
    })
    .transpose()
}
