//! Market session classification and the clock it reads.

use std::fmt::Debug;

use time::OffsetDateTime;

use crate::MarketSession;

/// Fixed offset used to approximate US Eastern time. Daylight saving,
/// weekends and exchange holidays are ignored.
const EASTERN_OFFSET_HOURS: u16 = 5;

const PRE_MARKET_START: u16 = 4 * 60;
const REGULAR_OPEN: u16 = 9 * 60 + 30;
const REGULAR_CLOSE: u16 = 16 * 60;
const AFTER_HOURS_END: u16 = 20 * 60;

/// Classify an instant into a trading session band.
///
/// Bands in approximate Eastern time: open `[09:30, 16:00)`, pre-market
/// `[04:00, 09:30)`, after-hours `[16:00, 20:00)`, closed otherwise.
pub fn classify_market_session(now: OffsetDateTime) -> MarketSession {
    let utc = now.to_offset(time::UtcOffset::UTC);
    let eastern_hour = (u16::from(utc.hour()) + 24 - EASTERN_OFFSET_HOURS) % 24;
    let minute_of_day = eastern_hour * 60 + u16::from(utc.minute());

    match minute_of_day {
        m if (REGULAR_OPEN..REGULAR_CLOSE).contains(&m) => MarketSession::Open,
        m if (PRE_MARKET_START..REGULAR_OPEN).contains(&m) => MarketSession::PreMarket,
        m if (REGULAR_CLOSE..AFTER_HOURS_END).contains(&m) => MarketSession::AfterHours,
        _ => MarketSession::Closed,
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync + Debug {
    fn now_utc(&self) -> OffsetDateTime;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now_utc(&self) -> OffsetDateTime {
        self.0
    }
}
