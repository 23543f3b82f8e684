//! Calendar-month periods offered by the picker

pub mod month_key;
pub mod window;

pub use month_key::{MonthKey, MonthKeyError};
pub use window::{last_months, Period, DEFAULT_PERIOD_COUNT};
