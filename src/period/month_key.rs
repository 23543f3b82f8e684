use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeDelta, TimeZone};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing or building a [`MonthKey`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MonthKeyError {
    /// Text is not in `YYYY-MM` form
    #[error("Invalid period key '{0}': expected YYYY-MM")]
    Malformed(String),

    /// Month outside 1..=12 or year outside the supported calendar
    #[error("Period {year}-{month:02} is out of range")]
    OutOfRange { year: i32, month: u32 },
}

/// Canonical calendar-month identifier, rendered as `YYYY-MM`.
///
/// Internally the first day of the month, so ordering follows the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthKeyError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or(MonthKeyError::OutOfRange { year, month })
    }

    /// Month that contains `instant`, using its local wall-clock date
    pub fn containing<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        let date = instant.date_naive();
        Self(date - Days::new(u64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// The month `n` months earlier. `None` only at the edge of chrono's calendar.
    pub fn months_before(self, n: u32) -> Option<Self> {
        self.0.checked_sub_months(Months::new(n)).map(Self)
    }

    /// The following calendar month
    pub fn next(self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(Self)
    }

    /// First instant of this month in `tz`
    pub fn start_in<Tz: TimeZone>(self, tz: &Tz) -> DateTime<Tz> {
        local_midnight(tz, self.0)
    }

    /// Half-open `[start, end)` window covering this month in `tz`
    pub fn range_in<Tz: TimeZone>(self, tz: &Tz) -> (DateTime<Tz>, DateTime<Tz>) {
        let start = self.start_in(tz);
        let end = match self.next() {
            Some(next) => next.start_in(tz),
            // Last representable month: close the window at its final day
            None => local_midnight(tz, self.0.with_day(28).unwrap_or(self.0)),
        };
        (start, end)
    }
}

/// First existing local instant of `date`.
///
/// Midnight can be skipped (DST jump) or repeated (DST fallback) in some zones;
/// a skipped midnight resolves to the first valid minute after it, a repeated
/// one to the earlier occurrence.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    if let Some(instant) = tz.from_local_datetime(&midnight).earliest() {
        return instant;
    }
    for minutes in 1..=180 {
        let candidate = midnight + TimeDelta::minutes(minutes);
        if let Some(instant) = tz.from_local_datetime(&candidate).earliest() {
            return instant;
        }
    }
    tz.from_utc_datetime(&midnight)
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MonthKeyError::Malformed(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(malformed)?;
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if year.len() != 4 || month.len() != 2 || !all_digits(year) || !all_digits(month) {
            return Err(malformed());
        }

        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        Self::new(year, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_parse_and_display_roundtrip() {
        let key: MonthKey = "2025-03".parse().unwrap();
        assert_eq!(key.year(), 2025);
        assert_eq!(key.month(), 3);
        assert_eq!(key.to_string(), "2025-03");
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        for text in ["", "2025", "2025-3", "25-03", "2025/03", "2025-03-01", "abcd-ef", "+025-03"] {
            assert_eq!(
                text.parse::<MonthKey>(),
                Err(MonthKeyError::Malformed(text.to_string())),
                "{text:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_parse_rejects_month_out_of_range() {
        assert_eq!(
            "2025-13".parse::<MonthKey>(),
            Err(MonthKeyError::OutOfRange { year: 2025, month: 13 })
        );
        assert!("2025-00".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_months_before_rolls_over_year() {
        let january = MonthKey::new(2025, 1).unwrap();
        assert_eq!(january.months_before(1).unwrap().to_string(), "2024-12");
        assert_eq!(january.months_before(13).unwrap().to_string(), "2023-12");
        assert_eq!(january.months_before(0), Some(january));
    }

    #[test]
    fn test_containing_uses_local_date() {
        // 2025-01-01 03:00 UTC is still December 31st at UTC-6
        let instant = Utc.with_ymd_and_hms(2025, 1, 1, 3, 0, 0).unwrap();
        let local = instant.with_timezone(&FixedOffset::west_opt(6 * 3600).unwrap());

        assert_eq!(MonthKey::containing(&instant).to_string(), "2025-01");
        assert_eq!(MonthKey::containing(&local).to_string(), "2024-12");
    }

    #[test]
    fn test_range_is_half_open_month() {
        let key = MonthKey::new(2024, 12).unwrap();
        let (start, end) = key.range_in(&Utc);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_ordering_follows_calendar() {
        let a = MonthKey::new(2024, 12).unwrap();
        let b = MonthKey::new(2025, 1).unwrap();
        assert!(a < b);
    }
}
