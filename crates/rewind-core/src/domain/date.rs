use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime};

use crate::ValidationError;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Calendar day with no time-of-day component.
///
/// All navigation compares and moves at day granularity, so the wrapped
/// value is a plain [`Date`] rather than a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradingDate(Date);

impl TradingDate {
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    /// The current UTC calendar day.
    pub fn today_utc() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    pub fn from_calendar(year: i32, month: u8, day: u8) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate {
            value: format!("{year:04}-{month:02}-{day:02}"),
        };
        let month = Month::try_from(month).map_err(|_| invalid())?;
        Date::from_calendar_date(year, month, day)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Drops the time-of-day part of a timestamp.
    pub fn from_datetime(value: OffsetDateTime) -> Self {
        Self(value.date())
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input.trim(), DATE_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    /// Shifts by whole days, saturating at the representable calendar limits.
    pub fn add_days(self, days: i64) -> Self {
        Self(
            self.0
                .checked_add(Duration::days(days))
                .unwrap_or(if days < 0 { Date::MIN } else { Date::MAX }),
        )
    }

    /// Shifts by calendar months. The day-of-month is clamped to the length
    /// of the target month, so Jan 31 plus one month is the last day of Feb.
    pub fn add_months(self, months: i32) -> Self {
        let month_index = self.0.year() * 12 + i32::from(u8::from(self.0.month())) - 1 + months;
        let year = month_index.div_euclid(12);
        let month_number = (month_index.rem_euclid(12) + 1) as u8;

        let Ok(month) = Month::try_from(month_number) else {
            return self;
        };
        let day = self.0.day().min(month.length(year));

        match Date::from_calendar_date(year, month, day) {
            Ok(date) => Self(date),
            Err(_) if months < 0 => Self(Date::MIN),
            Err(_) => Self(Date::MAX),
        }
    }

    pub fn format_iso(self) -> String {
        self.0
            .format(DATE_FORMAT)
            .unwrap_or_else(|_| String::from("<unformattable>"))
    }

    /// Midnight UTC of this day as unix seconds.
    pub fn unix_midnight(self) -> i64 {
        self.0.midnight().assume_utc().unix_timestamp()
    }
}

impl From<Date> for TradingDate {
    fn from(value: Date) -> Self {
        Self(value)
    }
}

impl FromStr for TradingDate {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Display for TradingDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for TradingDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for TradingDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn parses_iso_date() {
        let parsed = TradingDate::parse("2024-01-10").expect("must parse");
        assert_eq!(parsed.into_inner(), date!(2024 - 01 - 10));
        assert_eq!(parsed.to_string(), "2024-01-10");
    }

    #[test]
    fn rejects_timestamp_input() {
        let err = TradingDate::parse("2024-01-10T00:00:00Z").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
    }

    #[test]
    fn time_of_day_is_discarded() {
        let late = TradingDate::from_datetime(datetime!(2024-01-10 23:59:59 UTC));
        let early = TradingDate::from_datetime(datetime!(2024-01-10 00:00:01 UTC));
        assert_eq!(late, early);
    }

    #[test]
    fn month_arithmetic_clamps_day_of_month() {
        let jan_31 = TradingDate::new(date!(2024 - 01 - 31));
        assert_eq!(jan_31.add_months(1).into_inner(), date!(2024 - 02 - 29));
        assert_eq!(jan_31.add_months(-2).into_inner(), date!(2023 - 11 - 30));
    }

    #[test]
    fn month_arithmetic_uses_target_year_for_february() {
        let jan_31 = TradingDate::new(date!(2023 - 01 - 31));
        assert_eq!(jan_31.add_months(1).into_inner(), date!(2023 - 02 - 28));
        let mar_29 = TradingDate::new(date!(2024 - 03 - 29));
        assert_eq!(mar_29.add_months(-13).into_inner(), date!(2023 - 02 - 28));
    }

    #[test]
    fn month_arithmetic_crosses_year_boundaries() {
        let jan_10 = TradingDate::new(date!(2024 - 01 - 10));
        assert_eq!(jan_10.add_months(-1).into_inner(), date!(2023 - 12 - 10));
        assert_eq!(jan_10.add_months(12).into_inner(), date!(2025 - 01 - 10));
    }

    #[test]
    fn day_arithmetic_crosses_month_boundaries() {
        let mar_1 = TradingDate::new(date!(2024 - 03 - 01));
        assert_eq!(mar_1.add_days(-1).into_inner(), date!(2024 - 02 - 29));
    }

    #[test]
    fn serializes_as_plain_string() {
        let value = serde_json::to_string(&TradingDate::new(date!(2020 - 05 - 01))).expect("json");
        assert_eq!(value, "\"2020-05-01\"");
    }
}
