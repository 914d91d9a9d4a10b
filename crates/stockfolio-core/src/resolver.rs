//! Pure transformations from provider payloads into domain values.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::payload::{DailyBar, GlobalQuotePayload, SymbolMatch, SymbolSearchPayload};
use crate::{DailyPrice, Quote, SearchResult, Symbol, TradingDate};

/// Normalize search matches, keeping provider order.
pub fn normalize_search(payload: SymbolSearchPayload) -> Vec<SearchResult> {
    payload
        .best_matches
        .unwrap_or_default()
        .into_iter()
        .map(normalize_match)
        .collect()
}

fn normalize_match(raw: SymbolMatch) -> SearchResult {
    let match_score = raw
        .match_score
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite())
        .map_or(0.0, |score| score.clamp(0.0, 1.0));

    SearchResult {
        symbol: raw.symbol,
        name: raw.name,
        security_type: raw.security_type,
        region: raw.region,
        market_open: raw.market_open,
        market_close: raw.market_close,
        timezone: raw.timezone,
        currency: raw.currency,
        match_score,
    }
}

/// Trading date to use for `requested`: the date itself when present,
/// otherwise the latest available date before it.
///
/// Strings that are not ISO dates are skipped.
pub fn closest_trading_date<'a, I>(available: I, requested: TradingDate) -> Option<TradingDate>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut dates: Vec<TradingDate> = available
        .into_iter()
        .filter_map(|raw| TradingDate::parse(raw).ok())
        .collect();

    if dates.contains(&requested) {
        return Some(requested);
    }

    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.into_iter().find(|date| *date <= requested)
}

/// Daily bar for `requested`, falling back to the closest earlier trading day.
///
/// Rows whose numbers are missing or do not parse count as absent, so the
/// search moves on to the next earlier date. `None` when no usable row exists
/// on or before `requested`.
pub fn resolve_historical_price(
    series: &BTreeMap<String, DailyBar>,
    symbol: &Symbol,
    requested: TradingDate,
    timezone: Option<&str>,
) -> Option<DailyPrice> {
    let mut candidates: Vec<(TradingDate, &DailyBar)> = series
        .iter()
        .filter_map(|(key, bar)| Some((TradingDate::parse(key).ok()?, bar)))
        .filter(|(date, _)| *date <= requested)
        .collect();
    candidates.sort_unstable_by(|(a, _), (b, _)| b.cmp(a));

    let price = candidates.into_iter().find_map(|(date, bar)| {
        let parsed = parse_bar(symbol, date, bar, timezone);
        if parsed.is_none() {
            debug!(%symbol, %date, "skipping unparsable daily row");
        }
        parsed
    })?;

    if price.date != requested {
        debug!(%symbol, %requested, resolved = %price.date, "using closest earlier trading day");
    }
    Some(price)
}

fn parse_bar(
    symbol: &Symbol,
    date: TradingDate,
    bar: &DailyBar,
    timezone: Option<&str>,
) -> Option<DailyPrice> {
    Some(DailyPrice {
        symbol: symbol.clone(),
        date,
        open: parse_price(bar.open.as_deref()?)?,
        high: parse_price(bar.high.as_deref()?)?,
        low: parse_price(bar.low.as_deref()?)?,
        close: parse_price(bar.close.as_deref()?)?,
        volume: parse_volume(bar.volume.as_deref()?)?,
        currency: None,
        timezone: timezone.map(str::to_owned),
    })
}

/// Normalize a global quote. `None` when the provider returned no quote
/// object, an empty one, or one whose numbers do not parse.
pub fn normalize_quote(payload: GlobalQuotePayload) -> Option<Quote> {
    let fields = payload.quote?;
    let symbol = Symbol::parse(fields.symbol.as_deref()?).ok()?;

    let current_price = parse_price(fields.price.as_deref()?)?;
    let previous_close = parse_price(fields.previous_close.as_deref()?)?;
    let change_percent = fields
        .change_percent
        .as_deref()
        .and_then(parse_percent)
        .unwrap_or(Decimal::ZERO);

    Some(Quote {
        symbol,
        current_price,
        open_price: parse_price(fields.open.as_deref()?)?,
        high_price: parse_price(fields.high.as_deref()?)?,
        low_price: parse_price(fields.low.as_deref()?)?,
        previous_close,
        change: current_price - previous_close,
        change_percent,
        volume: parse_volume(fields.volume.as_deref()?)?,
        last_trading_day: TradingDate::parse(fields.latest_trading_day.as_deref()?).ok()?,
    })
}

fn parse_price(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim())
        .ok()
        .filter(|value| !value.is_sign_negative())
        .map(|value| value.normalize())
}

fn parse_percent(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim().trim_end_matches('%').trim())
        .ok()
        .map(|value| value.normalize())
}

fn parse_volume(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    raw.parse::<u64>().ok().or_else(|| {
        // Some feeds send "47471600.0".
        Decimal::from_str(raw)
            .ok()
            .filter(|value| !value.is_sign_negative() && value.fract().is_zero())
            .and_then(|value| value.to_u64())
    })
}
