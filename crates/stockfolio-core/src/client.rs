//! Market-data provider client.
//!
//! One generic `fetch` per provider function. Transport failures are retried
//! with backoff; logical failures reported inside a successful response are
//! returned immediately.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::MarketDataConfig;
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::payload::check_for_errors;
use crate::{ConfigError, ProviderError};

/// Provider endpoints used by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderFunction {
    SymbolSearch,
    TimeSeriesDaily,
    GlobalQuote,
}

impl ProviderFunction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SymbolSearch => "SYMBOL_SEARCH",
            Self::TimeSeriesDaily => "TIME_SERIES_DAILY",
            Self::GlobalQuote => "GLOBAL_QUOTE",
        }
    }
}

impl Display for ProviderFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct MarketDataClient {
    config: MarketDataConfig,
    http_client: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for MarketDataClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MarketDataClient {
    pub fn new(
        config: MarketDataConfig,
        http_client: Arc<dyn HttpClient>,
    ) -> Result<Self, ConfigError> {
        if config.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &MarketDataConfig {
        &self.config
    }

    /// `{base_url}?function=..&apikey=..&k=v..` with every value percent-encoded.
    pub fn build_url(&self, function: ProviderFunction, params: &[(&str, &str)]) -> String {
        let mut url = self.config.base_url.clone();
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str("function=");
        url.push_str(function.as_str());
        url.push_str("&apikey=");
        url.push_str(&urlencoding::encode(&self.config.api_key));
        for (name, value) in params {
            url.push('&');
            url.push_str(&urlencoding::encode(name));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Call one provider function and decode the payload into `T`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        function: ProviderFunction,
        params: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let url = self.build_url(function, params);
        info!(%function, params = %render_params(params), "calling market data provider");

        let response = self.execute_with_retry(function, &url).await?;
        let payload: Value = serde_json::from_str(&response.body).map_err(|e| {
            error!(%function, error = %e, "provider returned a non-json body");
            ProviderError::Decode(format!("{function} response is not json: {e}"))
        })?;

        if let Err(err) = check_for_errors(&payload) {
            warn!(%function, error = %err, "provider reported a logical failure");
            return Err(err);
        }

        serde_json::from_value(payload).map_err(|e| {
            error!(%function, error = %e, "provider payload has an unexpected shape");
            ProviderError::Decode(format!("{function} response has unexpected shape: {e}"))
        })
    }

    async fn execute_with_retry(
        &self,
        function: ProviderFunction,
        url: &str,
    ) -> Result<HttpResponse, ProviderError> {
        let retry = &self.config.retry;
        let mut attempt = 1;
        loop {
            let request = HttpRequest::get(url).with_timeout(self.config.timeout);
            let failure = match self.http_client.execute(request).await {
                Ok(response) if response.is_success() => {
                    debug!(%function, attempt, status = response.status, "provider responded");
                    return Ok(response);
                }
                Ok(response) => format!("provider returned http status {}", response.status),
                Err(e) => e.message().to_owned(),
            };

            match retry.delay_after(attempt) {
                Some(delay) => {
                    warn!(
                        %function,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %failure,
                        "provider call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    error!(%function, attempts = attempt, error = %failure, "provider call failed");
                    return Err(ProviderError::Transport {
                        attempts: attempt,
                        message: failure,
                    });
                }
            }
        }
    }
}

fn render_params(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}
