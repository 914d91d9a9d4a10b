//! Contract tests for the provider wire format.
//!
//! Each provider function is fetched through the real client against canned
//! bodies, then normalized, so a change in field naming shows up here first.

#[path = "../support/mod.rs"]
mod support;

use std::sync::Arc;

use rust_decimal::Decimal;
use stockfolio_core::payload::{DailySeriesPayload, GlobalQuotePayload, SymbolSearchPayload};
use stockfolio_core::resolver::{normalize_quote, normalize_search, resolve_historical_price};
use stockfolio_core::{
    MarketDataClient, ProviderError, ProviderFunction, Symbol, TradingDate,
};

use support::{market_data_config, ScriptedHttpClient, DAILY_BODY, QUOTE_BODY, SEARCH_BODY};

fn client_for(body: &str) -> (Arc<ScriptedHttpClient>, MarketDataClient) {
    let http = ScriptedHttpClient::always(body);
    let client = MarketDataClient::new(market_data_config(), http.clone())
        .expect("test key should be accepted");
    (http, client)
}

#[test]
fn provider_function_wire_names_are_stable() {
    let cases = [
        (ProviderFunction::SymbolSearch, "SYMBOL_SEARCH"),
        (ProviderFunction::TimeSeriesDaily, "TIME_SERIES_DAILY"),
        (ProviderFunction::GlobalQuote, "GLOBAL_QUOTE"),
    ];
    for (function, wire) in cases {
        assert_eq!(function.as_str(), wire);
        assert_eq!(function.to_string(), wire);
    }
}

#[tokio::test]
async fn symbol_search_fields_map_onto_search_results() {
    let (http, client) = client_for(SEARCH_BODY);

    let payload: SymbolSearchPayload = client
        .fetch(ProviderFunction::SymbolSearch, &[("keywords", "AAPL")])
        .await
        .expect("payload decodes");
    let results = normalize_search(payload);

    assert_eq!(results.len(), 2);
    let apple = &results[0];
    assert_eq!(apple.symbol, "AAPL");
    assert_eq!(apple.name, "Apple Inc.");
    assert_eq!(apple.security_type, "Equity");
    assert_eq!(apple.region, "United States");
    assert_eq!(apple.market_open, "09:30");
    assert_eq!(apple.market_close, "16:00");
    assert_eq!(apple.timezone, "UTC-04");
    assert_eq!(apple.currency, "USD");
    assert_eq!(apple.match_score, 1.0);

    assert_eq!(
        http.recorded_urls(),
        vec![String::from(
            "https://www.alphavantage.co/query?function=SYMBOL_SEARCH&apikey=test-key&keywords=AAPL"
        )]
    );
}

#[tokio::test]
async fn daily_series_fields_map_onto_daily_prices() {
    let (_http, client) = client_for(DAILY_BODY);

    let payload: DailySeriesPayload = client
        .fetch(
            ProviderFunction::TimeSeriesDaily,
            &[("symbol", "AAPL"), ("outputsize", "compact")],
        )
        .await
        .expect("payload decodes");
    assert_eq!(payload.time_zone(), Some("US/Eastern"));

    let series = payload.series.as_ref().expect("series present");
    assert_eq!(series.len(), 2);

    let symbol = Symbol::parse("AAPL").expect("valid symbol");
    let requested = TradingDate::parse("2024-01-15").expect("valid date");
    let price = resolve_historical_price(series, &symbol, requested, payload.time_zone())
        .expect("exact date present");

    assert_eq!(price.open, Decimal::new(18592, 2));
    assert_eq!(price.high, Decimal::new(18640, 2));
    assert_eq!(price.low, Decimal::new(18343, 2));
    assert_eq!(price.close, Decimal::new(18585, 2));
    assert_eq!(price.volume, 47_471_600);

    let json = serde_json::to_value(&price).expect("serializes");
    assert_eq!(json["date"], "2024-01-15");
    assert_eq!(json["close"], "185.85");
}

#[tokio::test]
async fn global_quote_fields_map_onto_quotes() {
    let (_http, client) = client_for(QUOTE_BODY);

    let payload: GlobalQuotePayload = client
        .fetch(ProviderFunction::GlobalQuote, &[("symbol", "AAPL")])
        .await
        .expect("payload decodes");
    let quote = normalize_quote(payload).expect("quote present");

    assert_eq!(quote.symbol.as_str(), "AAPL");
    assert_eq!(quote.current_price, Decimal::new(18585, 2));
    assert_eq!(quote.open_price, Decimal::new(18592, 2));
    assert_eq!(quote.high_price, Decimal::new(18640, 2));
    assert_eq!(quote.low_price, Decimal::new(18343, 2));
    assert_eq!(quote.previous_close, Decimal::new(18629, 2));
    assert_eq!(quote.change, Decimal::new(-44, 2));
    assert_eq!(quote.change_percent, Decimal::new(-2362, 4));
    assert_eq!(quote.volume, 47_471_600);
    assert_eq!(quote.last_trading_day.to_string(), "2024-01-15");
}

#[tokio::test]
async fn error_message_payload_is_a_logical_failure() {
    let (http, client) = client_for(
        r#"{"Error Message": "Invalid API call. Please retry or visit the documentation."}"#,
    );

    let error = client
        .fetch::<GlobalQuotePayload>(ProviderFunction::GlobalQuote, &[("symbol", "NOPE")])
        .await
        .expect_err("logical failure");

    assert!(matches!(
        error,
        ProviderError::Logical {
            field: "Error Message",
            ..
        }
    ));
    assert_eq!(http.recorded_urls().len(), 1);
}
