//! Wire shapes of the market-data provider's JSON responses.
//!
//! Field names follow the provider's numbered keys. Every numeric value
//! arrives as a string and is parsed by the resolver.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::ProviderError;

/// Advisory/error keys the provider embeds in 200-status bodies, in the order
/// they are checked.
pub const ADVISORY_FIELDS: [&str; 3] = ["Error Message", "Note", "Information"];

/// Fail when the payload carries one of the [`ADVISORY_FIELDS`].
pub fn check_for_errors(payload: &Value) -> Result<(), ProviderError> {
    for field in ADVISORY_FIELDS {
        match payload.get(field) {
            None | Some(Value::Null) => continue,
            Some(Value::String(message)) if message.trim().is_empty() => continue,
            Some(Value::String(message)) => {
                return Err(ProviderError::Logical {
                    field,
                    message: message.clone(),
                });
            }
            Some(other) => {
                return Err(ProviderError::Logical {
                    field,
                    message: other.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// `SYMBOL_SEARCH` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SymbolSearchPayload {
    #[serde(rename = "bestMatches", default)]
    pub best_matches: Option<Vec<SymbolMatch>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SymbolMatch {
    #[serde(rename = "1. symbol", default)]
    pub symbol: String,
    #[serde(rename = "2. name", default)]
    pub name: String,
    #[serde(rename = "3. type", default)]
    pub security_type: String,
    #[serde(rename = "4. region", default)]
    pub region: String,
    #[serde(rename = "5. marketOpen", default)]
    pub market_open: String,
    #[serde(rename = "6. marketClose", default)]
    pub market_close: String,
    #[serde(rename = "7. timezone", default)]
    pub timezone: String,
    #[serde(rename = "8. currency", default)]
    pub currency: String,
    #[serde(rename = "9. matchScore", default)]
    pub match_score: String,
}

/// `TIME_SERIES_DAILY` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailySeriesPayload {
    #[serde(rename = "Meta Data", default)]
    pub meta: Option<DailySeriesMeta>,
    #[serde(rename = "Time Series (Daily)", default)]
    pub series: Option<BTreeMap<String, DailyBar>>,
}

impl DailySeriesPayload {
    pub fn time_zone(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|meta| meta.time_zone.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailySeriesMeta {
    #[serde(rename = "2. Symbol", default)]
    pub symbol: Option<String>,
    #[serde(rename = "3. Last Refreshed", default)]
    pub last_refreshed: Option<String>,
    #[serde(rename = "5. Time Zone", default)]
    pub time_zone: Option<String>,
}

/// One row of the daily series. Fields are optional so that a single
/// incomplete row does not fail the whole payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyBar {
    #[serde(rename = "1. open", default)]
    pub open: Option<String>,
    #[serde(rename = "2. high", default)]
    pub high: Option<String>,
    #[serde(rename = "3. low", default)]
    pub low: Option<String>,
    #[serde(rename = "4. close", default)]
    pub close: Option<String>,
    #[serde(rename = "5. volume", default)]
    pub volume: Option<String>,
}

/// `GLOBAL_QUOTE` response. Unknown symbols come back as an empty object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalQuotePayload {
    #[serde(rename = "Global Quote", default)]
    pub quote: Option<GlobalQuoteFields>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalQuoteFields {
    #[serde(rename = "01. symbol", default)]
    pub symbol: Option<String>,
    #[serde(rename = "02. open", default)]
    pub open: Option<String>,
    #[serde(rename = "03. high", default)]
    pub high: Option<String>,
    #[serde(rename = "04. low", default)]
    pub low: Option<String>,
    #[serde(rename = "05. price", default)]
    pub price: Option<String>,
    #[serde(rename = "06. volume", default)]
    pub volume: Option<String>,
    #[serde(rename = "07. latest trading day", default)]
    pub latest_trading_day: Option<String>,
    #[serde(rename = "08. previous close", default)]
    pub previous_close: Option<String>,
    #[serde(rename = "09. change", default)]
    pub change: Option<String>,
    #[serde(rename = "10. change percent", default)]
    pub change_percent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rate_limit_note_is_a_logical_failure() {
        let payload = json!({ "Note": "Thank you for using Alpha Vantage! 5 calls per minute." });
        let err = check_for_errors(&payload).expect_err("must fail");
        assert!(matches!(err, ProviderError::Logical { field: "Note", .. }));
    }

    #[test]
    fn error_message_takes_precedence_over_information() {
        let payload = json!({
            "Information": "premium endpoint",
            "Error Message": "Invalid API call."
        });
        let err = check_for_errors(&payload).expect_err("must fail");
        assert_eq!(
            err,
            ProviderError::Logical {
                field: "Error Message",
                message: String::from("Invalid API call."),
            }
        );
    }

    #[test]
    fn regular_payloads_pass_the_check() {
        assert!(check_for_errors(&json!({ "bestMatches": [] })).is_ok());
        assert!(check_for_errors(&json!({ "Note": null })).is_ok());
    }

    #[test]
    fn blank_advisory_messages_are_ignored() {
        let payload = json!({ "Note": "", "Information": "  ", "bestMatches": [] });
        assert!(check_for_errors(&payload).is_ok());

        let payload = json!({ "Note": "", "Error Message": "Invalid API call." });
        let err = check_for_errors(&payload).expect_err("must fail");
        assert!(matches!(err, ProviderError::Logical { field: "Error Message", .. }));
    }

    #[test]
    fn incomplete_daily_rows_do_not_fail_the_series() {
        let payload: DailySeriesPayload = serde_json::from_value(json!({
            "Time Series (Daily)": {
                "2024-01-15": {
                    "1. open": "185.92",
                    "2. high": "186.40",
                    "3. low": "183.43",
                    "4. close": "185.85",
                    "5. volume": "47471600"
                },
                "2023-10-02": { "1. open": "171.22", "4. close": "173.75" }
            }
        }))
        .expect("deserialize");

        let series = payload.series.expect("series present");
        assert_eq!(series.len(), 2);
        assert_eq!(series["2023-10-02"].volume, None);
        assert_eq!(series["2024-01-15"].volume.as_deref(), Some("47471600"));
    }

    #[test]
    fn empty_global_quote_deserializes_to_blank_fields() {
        let payload: GlobalQuotePayload =
            serde_json::from_value(json!({ "Global Quote": {} })).expect("deserialize");
        let fields = payload.quote.expect("object present");
        assert!(fields.symbol.is_none());
        assert!(fields.price.is_none());
    }
}
