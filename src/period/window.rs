use super::month_key::MonthKey;
use chrono::{DateTime, FixedOffset, TimeZone};

/// Number of months offered by the picker
pub const DEFAULT_PERIOD_COUNT: usize = 24;

/// Wall-clock format used for both ends of a period label
const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One calendar month: its key, display label and `[start, end)` window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    key: MonthKey,
    label: String,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl Period {
    /// Build the period for `key` using the wall clock of `tz`
    pub fn in_zone<Tz: TimeZone>(key: MonthKey, tz: &Tz) -> Self {
        let (start, end) = key.range_in(tz);
        let start = start.fixed_offset();
        let end = end.fixed_offset();
        let label = format!(
            "{} – {}",
            start.format(LABEL_FORMAT),
            end.format(LABEL_FORMAT)
        );
        Self {
            key,
            label,
            start,
            end,
        }
    }

    pub fn key(&self) -> MonthKey {
        self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn start(&self) -> &DateTime<FixedOffset> {
        &self.start
    }

    /// Exclusive upper bound: first instant of the following month
    pub fn end(&self) -> &DateTime<FixedOffset> {
        &self.end
    }
}

/// The last `count` calendar months ending with the month of `now`, newest first.
///
/// Pure: the caller captures `now` once and passes it in, so repeated calls with
/// the same instant always agree.
pub fn last_months<Tz: TimeZone>(now: &DateTime<Tz>, count: usize) -> Vec<Period> {
    let tz = now.timezone();
    let current = MonthKey::containing(now);

    let periods: Vec<Period> = (0..count)
        .map_while(|offset| u32::try_from(offset).ok().and_then(|n| current.months_before(n)))
        .map(|key| Period::in_zone(key, &tz))
        .collect();

    tracing::debug!(
        "Generated {} periods from {} back to {}",
        periods.len(),
        current,
        periods.last().map(|p| p.key().to_string()).unwrap_or_default()
    );

    periods
}
