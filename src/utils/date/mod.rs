// Date rules
// Calendar-date parsing, formatting and day arithmetic plus the injectable clock

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::LicenseError;

/// A year/month/day value with no time-of-day and no timezone.
pub type CalendarDate = NaiveDate;

/// The only textual form accepted for expiry dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict, zero-padded `YYYY-MM-DD` date.
///
/// chrono alone accepts `2025-6-1` and signed years, so the shape is checked
/// before handing the text over. Calendar-invalid values such as
/// `2025-02-30` are rejected too.
///
/// # Examples
/// ```
/// use license_keeper::utils::date::parse_date;
/// let date = parse_date("2025-06-01").unwrap();
/// assert_eq!(date.to_string(), "2025-06-01");
/// assert!(parse_date("2025-6-1").is_err());
/// ```
pub fn parse_date(text: &str) -> Result<CalendarDate, LicenseError> {
    if !has_date_shape(text) {
        return Err(LicenseError::InvalidDateFormat(text.to_string()));
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| LicenseError::InvalidDateFormat(text.to_string()))
}

fn has_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Format a date as zero-padded `YYYY-MM-DD`; the inverse of [`parse_date`].
pub fn format_date(date: CalendarDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Signed number of calendar days from `from` to `to`.
pub fn days_between(from: CalendarDate, to: CalendarDate) -> i64 {
    (to - from).num_days()
}

/// Pin a calendar date to a wall-clock time of day.
pub fn at_time_of_day(date: CalendarDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(time)
}

/// Source of "now". Everything time-dependent takes one of these so tests
/// can pin the date.
pub trait Clock {
    /// Current local wall-clock instant.
    fn now(&self) -> NaiveDateTime;

    /// Current local calendar date.
    fn today(&self) -> CalendarDate {
        self.now().date()
    }
}

/// Reads the system clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// A clock stopped at midnight of `date`.
    pub fn on(date: CalendarDate) -> Self {
        Self(at_time_of_day(date, NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Today's local calendar date from the system clock.
pub fn today() -> CalendarDate {
    SystemClock.today()
}
