//! Expiry status engine.
//!
//! Pure functions over `(expiry, today)`. Nothing is cached: callers pass
//! the current day in and get a fresh answer every time.

use crate::models::record::Record;
use crate::models::status::{ExpiryStatus, RecordStatus, StatusReport, StatusSummary};
use crate::utils::date::{days_between, CalendarDate};

/// Records expiring within this many days (inclusive) are "expiring soon".
pub const EXPIRING_SOON_DAYS: i64 = 90;

/// Classify an expiry date relative to `today`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use license_keeper::models::status::ExpiryStatus;
/// use license_keeper::services::status::evaluate;
///
/// let expiry = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let today = NaiveDate::from_ymd_opt(2025, 5, 25).unwrap();
/// let report = evaluate(expiry, today);
/// assert_eq!(report.status, ExpiryStatus::ExpiringSoon);
/// assert_eq!(report.days_remaining, 7);
/// ```
pub fn evaluate(expiry: CalendarDate, today: CalendarDate) -> StatusReport {
    let days = days_between(today, expiry);

    let status = if days < 0 {
        ExpiryStatus::Expired
    } else if days <= EXPIRING_SOON_DAYS {
        ExpiryStatus::ExpiringSoon
    } else {
        ExpiryStatus::Active
    };

    StatusReport {
        status,
        days_remaining: days,
    }
}

/// Evaluate a stored record. An unparsable expiry yields `InvalidDate`
/// instead of being folded into one of the three buckets.
pub fn evaluate_record(record: &Record, today: CalendarDate) -> RecordStatus {
    match record.expiry() {
        Ok(expiry) => RecordStatus::Evaluated(evaluate(expiry, today)),
        Err(_) => {
            log::warn!(
                "License {:?} ({}) has unreadable expiry date {:?}",
                record.id,
                record.name,
                record.expiry_date
            );
            RecordStatus::InvalidDate {
                raw: record.expiry_date.clone(),
            }
        }
    }
}

pub fn is_expired(record: &Record, today: CalendarDate) -> bool {
    matches!(
        evaluate_record(record, today).report(),
        Some(StatusReport {
            status: ExpiryStatus::Expired,
            ..
        })
    )
}

/// Fold the engine over a snapshot of records.
pub fn summarize<'r, I>(records: I, today: CalendarDate) -> StatusSummary
where
    I: IntoIterator<Item = &'r Record>,
{
    records
        .into_iter()
        .fold(StatusSummary::default(), |mut summary, record| {
            summary.record(&evaluate_record(record, today));
            summary
        })
}
