use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::ValidationError;

/// Calendar date in `YYYY-MM-DD` form, as used by the daily series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TradingDate(Date);

impl TradingDate {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        // The format parser accepts variable-width years; pin the shape first.
        if trimmed.len() != 10 {
            return Err(ValidationError::InvalidDate {
                value: input.to_owned(),
            });
        }

        Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    /// UTC calendar date of the given instant.
    pub fn of(now: OffsetDateTime) -> Self {
        Self(now.to_offset(time::UtcOffset::UTC).date())
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    pub fn format_iso(self) -> String {
        let (year, month, day) = (self.0.year(), u8::from(self.0.month()), self.0.day());
        format!("{year:04}-{month:02}-{day:02}")
    }
}

impl Display for TradingDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl TryFrom<String> for TradingDate {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TradingDate> for String {
    fn from(value: TradingDate) -> Self {
        value.format_iso()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_and_formats_iso_dates() {
        let date = TradingDate::parse("2024-01-05").expect("valid date");
        assert_eq!(date.to_string(), "2024-01-05");
    }

    #[test]
    fn rejects_malformed_and_impossible_dates() {
        for raw in ["2024-1-5", "2024/01/05", "2024-02-30", "", "20240105"] {
            let err = TradingDate::parse(raw).expect_err("must fail");
            assert!(matches!(err, ValidationError::InvalidDate { .. }), "{raw}");
        }
    }

    #[test]
    fn orders_chronologically() {
        let earlier = TradingDate::parse("2023-12-29").expect("valid");
        let later = TradingDate::parse("2024-01-02").expect("valid");
        assert!(earlier < later);
    }

    #[test]
    fn today_uses_the_utc_calendar_day() {
        let now = datetime!(2024-03-01 01:30 +08:00);
        assert_eq!(TradingDate::of(now).to_string(), "2024-02-29");
    }
}
